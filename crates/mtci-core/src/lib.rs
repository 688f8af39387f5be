//! Core engine for metamorphic testing under a wall-clock budget.
//!
//! The crate owns the decision engine of an `mtci` session:
//!
//! - [`selection`]: budgeted, score-ranked choice of which relations to run
//! - [`engine`]: the sequential runner with retry and flake classification
//! - [`state`]: per-relation statistics persisted across sessions
//! - [`tolerance`]: the scalar acceptance predicate shared by all relations
//!
//! Everything around it (config, dataset, model adapters, reports) lives here
//! too so that the CLI is a thin shell over [`engine::session::run_profile`].

pub mod attempts;
pub mod config;
pub mod dataset;
pub mod engine;
pub mod errors;
pub mod model;
pub mod providers;
pub mod registry;
pub mod relation_api;
pub mod report;
pub mod selection;
pub mod state;
pub mod tolerance;

pub use errors::MtciError;
pub use tolerance::{within_tolerance, Tolerance};
