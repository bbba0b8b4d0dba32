//! carecall-storage
//!
//! The durable record store: patient profiles and call reports in SQLite,
//! behind a pooled, async-friendly handle.

pub mod db;
pub mod error;
pub mod migrations;
pub mod profiles;
pub mod reports;

pub use db::Database;
pub use reports::{InsertOutcome, ReportPage};
