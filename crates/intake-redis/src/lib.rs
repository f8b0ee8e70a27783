//! Intake Redis Data Layer
//!
//! Async Redis persistence for questionnaire responses and client portal
//! access records.

pub mod client;
pub mod queries;

pub use client::{RedisError, RedisPool, RedisResult, init_pool};
pub use queries::portal;
pub use queries::responses;
