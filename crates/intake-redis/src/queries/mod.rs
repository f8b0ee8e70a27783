//! Query implementations, one module per stored record type.
//!
//! Key layout:
//! - `intake:response:{client_id}` hash (`data`, `status`, `updated_at`)
//! - `intake:responses:all` sorted set of client ids, scored by last update
//! - `intake:portal:{id}` hash (`data`, `questionnaire_status`)
//! - `intake:portals:all` sorted set of portal ids, scored by creation time

pub mod portal;
pub mod responses;
