//! The call-report ingestion pipeline.
//!
//! Steps run strictly in sequence: replay check, identity resolution,
//! transcript normalization, mood assessment, report write. Only the
//! replay check and the write can fail; every other step degrades.

use serde_json::json;
use tracing::{info, warn};

use carecall_audit::{AuditAction, AuditEvent};
use carecall_bedrock::assessment::{AssessmentSource, assess_mood};
use carecall_core::identity::{IdentitySource, resolve_identity};
use carecall_core::models::call_event::CallEvent;
use carecall_core::models::mood::MoodJudgment;
use carecall_core::models::report::{CallReport, NewCallReport};
use carecall_core::transcript::normalize_transcript;
use carecall_storage::error::StorageError;

use crate::state::AppState;

#[derive(Debug, Clone)]
pub struct IngestOutcome {
    pub report: CallReport,
    pub judgment: MoodJudgment,
    /// `true` when the conversation had already been recorded and no new
    /// report was written.
    pub replayed: bool,
}

impl IngestOutcome {
    fn replayed(report: CallReport) -> Self {
        Self {
            judgment: report.judgment(),
            report,
            replayed: true,
        }
    }
}

/// Turn one validated call event into a stored report.
pub async fn process_call_event(
    state: &AppState,
    event: CallEvent,
) -> Result<IngestOutcome, StorageError> {
    let conversation_id = event.conversation_id().map(str::to_string);

    if let Some(conversation_id) = conversation_id.as_deref()
        && let Some(existing) = state.db.find_report_by_conversation(conversation_id).await?
    {
        info!(
            report_id = %existing.id,
            conversation_id,
            "call event already processed, returning stored report"
        );
        emit_report_audit(AuditAction::ReportReplayed, &existing, conversation_id);
        return Ok(IngestOutcome::replayed(existing));
    }

    // Single-tenant attribution: any stored profile wins over the event's
    // subject id.
    let known_patient = match state.db.first_profile().await {
        Ok(profile) => profile,
        Err(e) => {
            warn!(error = %e, "profile lookup failed, resolving identity without it");
            None
        }
    };
    let identity = resolve_identity(event.subject_id(), known_patient.as_ref());
    if identity.source == IdentitySource::Anonymous {
        info!(conversation_id = ?conversation_id, "no patient identity available, recording as anonymous");
    }

    let transcript = normalize_transcript(event.data.transcript.as_deref());

    let assessment = assess_mood(
        state.classifier.as_ref(),
        known_patient.as_ref(),
        &transcript,
        &state.assessment,
    )
    .await;
    if assessment.source == AssessmentSource::Fallback {
        warn!(user_id = %identity.user_id, "recording call report with fallback mood judgment");
    }

    let outcome = state
        .db
        .insert_report(NewCallReport {
            user_id: identity.user_id,
            conversation_id,
            judgment: assessment.judgment,
        })
        .await?;

    let report = outcome.report;
    let conversation = report.conversation_id.clone().unwrap_or_default();
    if outcome.created {
        info!(
            report_id = %report.id,
            user_id = %report.user_id,
            mood = report.mood.get(),
            transcript_len = transcript.len(),
            "call report saved"
        );
        emit_report_audit(AuditAction::ReportCreated, &report, &conversation);
    } else {
        // Lost a race with a concurrent delivery of the same conversation.
        emit_report_audit(AuditAction::ReportReplayed, &report, &conversation);
    }

    Ok(IngestOutcome {
        judgment: report.judgment(),
        report,
        replayed: !outcome.created,
    })
}

fn emit_report_audit(action: AuditAction, report: &CallReport, conversation_id: &str) {
    AuditEvent::new(
        action,
        "phone_call_report",
        report.id.to_string(),
        report.user_id.clone(),
    )
    .with_details(json!({
        "conversation_id": conversation_id,
        "mood": report.mood.get(),
    }))
    .emit();
}
