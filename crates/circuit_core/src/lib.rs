//! Core scoring logic for the poker circuit.
//!
//! Everything in this crate is pure: no storage, no logging, no global state.
//! The `circuit` crate feeds it rows from the database and hands the results
//! to reports and the command line.
//!
//! Data flows one way:
//! stage entries -> [`validate_stage_results`] -> [`score_stage_entries`]
//! -> stored results -> [`aggregate_ranking`] / [`build_stage_scores`].

pub mod breakdown;
pub mod ranking;
pub mod scoring;
pub mod types;
pub mod validation;

pub use breakdown::*;
pub use ranking::*;
pub use scoring::*;
pub use types::*;
pub use validation::*;
