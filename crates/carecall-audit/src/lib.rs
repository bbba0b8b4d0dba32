//! carecall-audit
//!
//! Application-level audit events for access to patient data.

pub mod events;

pub use events::{AuditAction, AuditEvent};
