use crate::belief::Answer;
use crate::model::EntityId;
use core::fmt;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SessionState {
    Asking,
    /// One candidate left, or the leader cleared the confidence threshold.
    Won,
    /// Question budget spent with several candidates still live.
    Exhausted,
    /// Every candidate was eliminated.
    NoMatch,
    /// Several candidates remain but no attribute separates them.
    Stuck,
    /// The host or the answerer stopped the round.
    Aborted,
}

impl SessionState {
    pub const fn is_terminal(self) -> bool {
        !matches!(self, SessionState::Asking)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            SessionState::Asking => "ASKING",
            SessionState::Won => "WON",
            SessionState::Exhausted => "EXHAUSTED",
            SessionState::NoMatch => "NO_MATCH",
            SessionState::Stuck => "STUCK",
            SessionState::Aborted => "ABORTED",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One completed question/answer exchange.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub number: u32,
    pub attribute: String,
    pub answer: Answer,
    pub gain: f64,
    pub live_before: usize,
    pub live_after: usize,
    pub leader: Option<EntityId>,
    pub confidence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionOutcome {
    pub state: SessionState,
    pub guess: Option<EntityId>,
    pub confidence: f64,
    pub questions_asked: u32,
    pub history: Vec<RoundRecord>,
}

impl SessionOutcome {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn states_serialize_as_tags() {
        let json = serde_json::to_string(&SessionState::NoMatch).unwrap();
        assert_eq!(json, "\"NO_MATCH\"");
        assert_eq!(SessionState::Won.to_string(), "WON");
        assert!(!SessionState::Asking.is_terminal());
        assert!(SessionState::Stuck.is_terminal());
    }

    #[test]
    fn outcome_json_roundtrip() {
        let outcome = SessionOutcome {
            state: SessionState::Exhausted,
            guess: Some(EntityId::new("Kaka")),
            confidence: 0.5,
            questions_asked: 3,
            history: vec![RoundRecord {
                number: 1,
                attribute: "retired".to_string(),
                answer: Answer::Bool(true),
                gain: 1.0,
                live_before: 4,
                live_after: 2,
                leader: Some(EntityId::new("Kaka")),
                confidence: 0.5,
            }],
        };
        let json = outcome.to_json().unwrap();
        assert!(json.contains("\"state\": \"EXHAUSTED\""));
        assert_eq!(SessionOutcome::from_json(&json).unwrap(), outcome);
    }
}
