use super::RoundRecord;
use crate::belief::{Answer, BeliefState};
use crate::question::Question;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerOutcome {
    Answer(Answer),
    Abort,
}

/// Source of answers for a running session (a terminal, an oracle, a test script).
pub trait Answerer {
    /// Blocks until the question is answered or the asker gives up.
    fn answer(&mut self, question: &Question, belief: &BeliefState) -> AnswerOutcome;

    /// Called after every belief update so callers can render progress.
    fn observe(&mut self, _round: &RoundRecord, _belief: &BeliefState) {}
}

/// Shared flag a host can raise to stop a session at the next round boundary.
#[derive(Debug, Clone, Default)]
pub struct AbortHandle {
    flag: Arc<AtomicBool>,
}

impl AbortHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn abort(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::AbortHandle;

    #[test]
    fn clones_share_the_flag() {
        let handle = AbortHandle::new();
        let remote = handle.clone();
        assert!(!handle.is_aborted());
        remote.abort();
        assert!(handle.is_aborted());
    }
}
