//! Attribution of an inbound call to a patient identity.
//!
//! Deployments currently serve a single patient: when any profile exists,
//! its owner is credited with every call, because the call platform cannot
//! always supply the real subject identifier. Otherwise the platform's
//! subject id is used, and failing that the anonymous sentinel.

use crate::models::profile::PatientProfile;

/// Identity recorded when neither a profile nor a subject id is available.
pub const ANONYMOUS_USER_ID: &str = "anonymous-user";

/// Where a resolved identity came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentitySource {
    /// The deployment's known patient profile.
    Profile,
    /// The subject identifier carried by the call event.
    Subject,
    /// Neither was available.
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedIdentity {
    pub user_id: String,
    pub source: IdentitySource,
}

/// Pick the identity to attach a report to. Never fails.
///
/// `known_patient` is the result of the profile lookup; a failed lookup is
/// passed as `None` by the caller.
pub fn resolve_identity(
    subject_id: Option<&str>,
    known_patient: Option<&PatientProfile>,
) -> ResolvedIdentity {
    if let Some(profile) = known_patient {
        return ResolvedIdentity {
            user_id: profile.user_id.clone(),
            source: IdentitySource::Profile,
        };
    }

    match subject_id.filter(|id| !id.is_empty()) {
        Some(id) => ResolvedIdentity {
            user_id: id.to_string(),
            source: IdentitySource::Subject,
        },
        None => ResolvedIdentity {
            user_id: ANONYMOUS_USER_ID.to_string(),
            source: IdentitySource::Anonymous,
        },
    }
}
