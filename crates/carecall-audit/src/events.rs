use serde::Serialize;
use tracing::info;

/// Actions on patient data that are recorded in the audit trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum AuditAction {
    #[serde(rename = "report.created")]
    ReportCreated,
    #[serde(rename = "report.replayed")]
    ReportReplayed,
    #[serde(rename = "reports.listed")]
    ReportsListed,
    #[serde(rename = "profile.saved")]
    ProfileSaved,
    #[serde(rename = "profile.loaded")]
    ProfileLoaded,
}

impl AuditAction {
    pub fn as_str(self) -> &'static str {
        match self {
            AuditAction::ReportCreated => "report.created",
            AuditAction::ReportReplayed => "report.replayed",
            AuditAction::ReportsListed => "reports.listed",
            AuditAction::ProfileSaved => "profile.saved",
            AuditAction::ProfileLoaded => "profile.loaded",
        }
    }
}

/// A structured audit event for an access to patient data.
///
/// Emitted through `tracing` so it lands in the same JSON log stream as
/// request logs. Details must never contain transcript text or profile
/// field values, only identifiers and counts.
#[derive(Debug, Clone, Serialize)]
pub struct AuditEvent {
    pub action: AuditAction,
    pub resource_type: String,
    pub resource_id: String,
    pub actor: String,
    pub details: Option<serde_json::Value>,
}

impl AuditEvent {
    pub fn new(
        action: AuditAction,
        resource_type: impl Into<String>,
        resource_id: impl Into<String>,
        actor: impl Into<String>,
    ) -> Self {
        Self {
            action,
            resource_type: resource_type.into(),
            resource_id: resource_id.into(),
            actor: actor.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }

    pub fn emit(&self) {
        let details = self
            .details
            .as_ref()
            .map(serde_json::Value::to_string)
            .unwrap_or_default();
        info!(
            audit.action = self.action.as_str(),
            audit.resource_type = %self.resource_type,
            audit.resource_id = %self.resource_id,
            audit.actor = %self.actor,
            audit.details = %details,
            "audit event"
        );
    }
}
