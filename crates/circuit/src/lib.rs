//! Poker circuit runner
//!
//! This crate provides infrastructure for:
//! - Registering players and creating 12-stage tournaments
//! - Recording stage results, scored with the circuit points tables
//! - Computing per-tournament rankings and stage-by-stage breakdowns
//! - Generating text and JSON reports
//!
//! # Usage
//!
//! ```bash
//! # Record stage 1 of tournament 1 (stage ids come from `tournament stages`)
//! cargo run -p circuit -- stage submit 1 4:1 7:2 2:3
//!
//! # Print the current ranking and export it
//! cargo run -p circuit -- ranking 1 --json reports/season.json
//! ```

mod config;
mod error;
mod report;
mod schema;
mod service;
mod sqlite;
mod store;

pub use config::*;
pub use error::*;
pub use report::*;
pub use service::*;
pub use sqlite::*;
pub use store::*;

pub use circuit_core;
