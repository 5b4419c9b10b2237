use super::{
    AbortHandle, AnswerOutcome, Answerer, RoundRecord, SessionConfig, SessionOutcome, SessionState,
};
use crate::belief::{Answer, BeliefState, update};
use crate::model::{Catalogue, Schema};
use crate::question::{Question, select_question};

/// One guessing round over a shared, read-only catalogue.
///
/// The session exclusively owns its belief state. Each round checks the abort
/// flag and the terminal conditions before any selection work, so a session
/// stopped between rounds keeps the belief state of its last completed update.
#[derive(Debug, Clone)]
pub struct Session<'a> {
    catalogue: &'a Catalogue,
    schema: &'a Schema,
    config: SessionConfig,
    belief: BeliefState,
    asked: u32,
    phase: SessionState,
    history: Vec<RoundRecord>,
    abort: Option<AbortHandle>,
}

impl<'a> Session<'a> {
    pub fn new(catalogue: &'a Catalogue, schema: &'a Schema, config: SessionConfig) -> Self {
        Self {
            catalogue,
            schema,
            config,
            belief: BeliefState::uniform(catalogue),
            asked: 0,
            phase: SessionState::Asking,
            history: Vec::new(),
            abort: None,
        }
    }

    pub fn with_abort(mut self, handle: AbortHandle) -> Self {
        self.abort = Some(handle);
        self
    }

    pub fn catalogue(&self) -> &'a Catalogue {
        self.catalogue
    }

    pub fn schema(&self) -> &'a Schema {
        self.schema
    }

    pub fn config(&self) -> SessionConfig {
        self.config
    }

    pub fn belief(&self) -> &BeliefState {
        &self.belief
    }

    pub fn phase(&self) -> SessionState {
        self.phase
    }

    pub fn questions_asked(&self) -> u32 {
        self.asked
    }

    pub fn history(&self) -> &[RoundRecord] {
        &self.history
    }

    pub fn is_finished(&self) -> bool {
        self.phase.is_terminal()
    }

    /// Evaluates the round-boundary conditions, moving to a terminal state when one holds.
    pub fn check_terminal(&mut self) -> SessionState {
        if self.phase.is_terminal() {
            return self.phase;
        }
        if self.abort.as_ref().is_some_and(AbortHandle::is_aborted) {
            self.phase = SessionState::Aborted;
            return self.phase;
        }
        self.phase = match self.belief.live_count() {
            0 => SessionState::NoMatch,
            1 => SessionState::Won,
            _ if self.asked >= self.config.max_questions => SessionState::Exhausted,
            _ => SessionState::Asking,
        };
        self.phase
    }

    /// The question the selector would ask now, without touching session state.
    pub fn next_question(&self) -> Option<Question> {
        if self.phase.is_terminal() {
            return None;
        }
        select_question(self.catalogue, self.schema, &self.belief)
    }

    /// Applies an answer to `question`. Returns `None` once the session has ended.
    pub fn apply(&mut self, question: &Question, answer: Answer) -> Option<&RoundRecord> {
        if self.phase.is_terminal() {
            return None;
        }

        let live_before = self.belief.live_count();
        self.belief = update(
            self.catalogue,
            self.schema,
            &self.belief,
            &question.attribute,
            &answer,
        );
        self.asked += 1;

        let (leader, confidence) = match self.belief.top() {
            Some(entry) => (Some(entry.id.clone()), entry.weight),
            None => (None, 0.0),
        };
        if confidence > self.config.confidence_threshold {
            self.phase = SessionState::Won;
        }

        self.history.push(RoundRecord {
            number: self.asked,
            attribute: question.attribute.clone(),
            answer,
            gain: question.gain,
            live_before,
            live_after: self.belief.live_count(),
            leader,
            confidence,
        });
        self.history.last()
    }

    /// Runs a single round and reports the resulting phase.
    pub fn step<A>(&mut self, answerer: &mut A) -> SessionState
    where
        A: Answerer + ?Sized,
    {
        if self.check_terminal().is_terminal() {
            return self.phase;
        }

        let Some(question) = self.next_question() else {
            self.phase = SessionState::Stuck;
            return self.phase;
        };

        match answerer.answer(&question, &self.belief) {
            AnswerOutcome::Abort => self.phase = SessionState::Aborted,
            AnswerOutcome::Answer(answer) => {
                if self.apply(&question, answer).is_some() {
                    if let Some(record) = self.history.last() {
                        answerer.observe(record, &self.belief);
                    }
                }
            }
        }
        self.phase
    }

    /// Drives rounds until a terminal state is reached.
    pub fn run<A>(&mut self, answerer: &mut A) -> SessionOutcome
    where
        A: Answerer + ?Sized,
    {
        while !self.step(answerer).is_terminal() {}
        self.outcome()
    }

    /// Result snapshot. Before termination the state reads `Asking`.
    pub fn outcome(&self) -> SessionOutcome {
        let (guess, confidence) = match (self.phase, self.belief.top()) {
            (SessionState::NoMatch, _) | (_, None) => (None, 0.0),
            (_, Some(entry)) => (Some(entry.id.clone()), entry.weight),
        };
        SessionOutcome {
            state: self.phase,
            guess,
            confidence,
            questions_asked: self.asked,
            history: self.history.clone(),
        }
    }
}
