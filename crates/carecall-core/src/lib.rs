//! carecall-core
//!
//! Pure domain types for the call-monitoring pipeline: patient profiles,
//! inbound call events, mood judgments, call reports and pagination.
//! No storage or network dependency; this is the shared vocabulary of the
//! CareCall system.

pub mod error;
pub mod identity;
pub mod models;
pub mod transcript;
