//! Intake Core Library
//!
//! Domain models and business logic for the client intake questionnaire:
//! the question catalog, per-client response aggregates, pre-population from
//! client records, section validation and the questionnaire controller.

pub mod catalog;
pub mod config;
pub mod error;
pub mod events;
pub mod portal;
pub mod questionnaire;
pub mod store;

pub use error::{IntakeError, IntakeResult};
