//! Command-line front end for the twenty questions engine: configuration,
//! catalogue loading, terminal play and self-play simulation.

pub mod catalogue;
pub mod config;
pub mod logging;
pub mod render;
pub mod simulate;
pub mod terminal;
