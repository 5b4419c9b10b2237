//! Adaptive question selection driven by expected information gain.

mod gain;
mod selector;

pub use gain::information_gain;
pub use selector::{Question, ScoredAttribute, score_attributes, select_question};
