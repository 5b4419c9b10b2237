//! Probability mass over which catalogue entity is the hidden target.
//!
//! This module is composed of:
//! - `state`: the normalized distribution (`BeliefState`) and its invariant-checking constructors.
//! - `entropy`: Shannon entropy over arbitrary weight multisets.
//! - `update`: answer normalization and the elimination/renormalization step.

mod entropy;
mod state;
mod update;

pub use entropy::entropy;
pub use state::{BeliefEntry, BeliefError, BeliefState};
pub use update::{Answer, update};
