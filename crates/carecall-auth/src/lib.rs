//! carecall-auth
//!
//! Validation of session tokens issued by the authentication provider.

pub mod error;
pub mod jwt;
