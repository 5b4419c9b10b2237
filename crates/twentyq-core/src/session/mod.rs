//! Guessing round state machine.
//!
//! - `config`: question budget and confidence threshold.
//! - `answerer`: the seam through which answers (and aborts) arrive.
//! - `runner`: the `Session` itself, driving selector → answer → update cycles.
//! - `outcome`: terminal states and the result value reported to callers.

mod answerer;
mod config;
mod outcome;
mod runner;

pub use answerer::{AbortHandle, AnswerOutcome, Answerer};
pub use config::{CONFIDENCE_ENV, MAX_QUESTIONS_ENV, SessionConfig, SessionConfigError};
pub use outcome::{RoundRecord, SessionOutcome, SessionState};
pub use runner::Session;
