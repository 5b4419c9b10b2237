use core::fmt;
use serde::{Deserialize, Serialize};
use std::env;

const DEFAULT_MAX_QUESTIONS: u32 = 20;
const DEFAULT_CONFIDENCE_THRESHOLD: f64 = 0.95;
pub const MAX_QUESTIONS_ENV: &str = "TWENTYQ_MAX_QUESTIONS";
pub const CONFIDENCE_ENV: &str = "TWENTYQ_CONFIDENCE";

/// Budget and stopping policy for one guessing round.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Questions allowed before the round ends with the current best guess.
    #[serde(default = "default_max_questions")]
    pub max_questions: u32,
    /// A leading weight strictly above this value ends the round early.
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_questions: DEFAULT_MAX_QUESTIONS,
            confidence_threshold: DEFAULT_CONFIDENCE_THRESHOLD,
        }
    }
}

impl SessionConfig {
    pub fn new(max_questions: u32, confidence_threshold: f64) -> Result<Self, SessionConfigError> {
        let config = Self {
            max_questions,
            confidence_threshold,
        };
        config.validate()?;
        Ok(config)
    }

    /// Defaults with `TWENTYQ_MAX_QUESTIONS` / `TWENTYQ_CONFIDENCE` applied.
    pub fn from_env() -> Self {
        Self::default().with_env_overrides()
    }

    /// Replaces fields whose environment variable is set and parses.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| env::var(key).ok())
    }

    /// Same as [`with_env_overrides`](Self::with_env_overrides) over an arbitrary lookup.
    /// Unparseable values leave the field as it was; thresholds are clamped to (0, 1].
    pub fn with_overrides<F>(self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let max_questions = lookup(MAX_QUESTIONS_ENV)
            .and_then(|value| value.trim().parse::<u32>().ok())
            .unwrap_or(self.max_questions);
        let confidence_threshold = lookup(CONFIDENCE_ENV)
            .and_then(|value| value.trim().parse::<f64>().ok())
            .filter(|value| value.is_finite() && *value > 0.0)
            .map(|value| value.min(1.0))
            .unwrap_or(self.confidence_threshold);

        Self {
            max_questions,
            confidence_threshold,
        }
    }

    pub fn validate(&self) -> Result<(), SessionConfigError> {
        let threshold = self.confidence_threshold;
        if !threshold.is_finite() || threshold <= 0.0 || threshold > 1.0 {
            return Err(SessionConfigError::ConfidenceOutOfRange(threshold));
        }
        Ok(())
    }
}

fn default_max_questions() -> u32 {
    DEFAULT_MAX_QUESTIONS
}

fn default_confidence_threshold() -> f64 {
    DEFAULT_CONFIDENCE_THRESHOLD
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionConfigError {
    ConfidenceOutOfRange(f64),
}

impl fmt::Display for SessionConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionConfigError::ConfidenceOutOfRange(value) => {
                write!(f, "confidence threshold {value} must lie in (0, 1]")
            }
        }
    }
}

impl std::error::Error for SessionConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_classic_game() {
        let config = SessionConfig::default();
        assert_eq!(config.max_questions, 20);
        assert_eq!(config.confidence_threshold, 0.95);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_thresholds_outside_unit_interval() {
        assert!(SessionConfig::new(5, 0.0).is_err());
        assert!(SessionConfig::new(5, 1.5).is_err());
        assert!(SessionConfig::new(5, f64::NAN).is_err());
        assert!(SessionConfig::new(0, 1.0).is_ok());
    }

    #[test]
    fn missing_fields_deserialize_to_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"max_questions": 7}"#).unwrap();
        assert_eq!(config.max_questions, 7);
        assert_eq!(config.confidence_threshold, 0.95);
    }

    #[test]
    fn overrides_replace_only_the_variables_that_are_set() {
        let base = SessionConfig::new(7, 0.8).unwrap();

        let confident =
            base.with_overrides(|key| (key == CONFIDENCE_ENV).then(|| "0.6".to_string()));
        assert_eq!(confident.max_questions, 7);
        assert_eq!(confident.confidence_threshold, 0.6);

        let garbled = base.with_overrides(|key| match key {
            MAX_QUESTIONS_ENV => Some("many".to_string()),
            CONFIDENCE_ENV => Some("3.0".to_string()),
            _ => None,
        });
        assert_eq!(garbled.max_questions, 7);
        assert_eq!(garbled.confidence_threshold, 1.0);

        assert_eq!(base.with_overrides(|_| None), base);
    }
}
