use axum::Json;
use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, info};

use carecall_audit::{AuditAction, AuditEvent};
use carecall_core::models::call_event::CallEvent;
use carecall_core::models::mood::MoodJudgment;
use carecall_core::models::pagination::{PageRequest, Pagination};
use carecall_core::models::report::CallReport;

use crate::error::ApiError;
use crate::ingest;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Used when a report query names no phone number.
pub const DEFAULT_PHONE_NUMBER: &str = "+1234567890";

pub const SAVED_MESSAGE: &str = "Phone call report saved successfully with AI mood analysis";
pub const REPLAYED_MESSAGE: &str = "Phone call report already recorded";
pub const RETRIEVED_MESSAGE: &str = "Phone call reports retrieved successfully";

const SAVE_FAILED: &str = "Failed to save phone call report";
const LIST_FAILED: &str = "Failed to retrieve phone call reports";

const SAVE_METHOD_NOT_ALLOWED: &str = "Method not allowed. Only POST requests are supported.";
const LIST_METHOD_NOT_ALLOWED: &str = "Method not allowed. Only GET requests are supported.";

#[derive(Serialize)]
pub struct SaveReportResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: CallReport,
    pub mood_analysis: MoodJudgment,
}

/// Webhook receiving completed calls from the call platform.
///
/// Unauthenticated. Payload problems are 400s; model trouble never is.
/// The pipeline runs in its own task so a dropped connection does not
/// abandon the write.
pub async fn save_phone_call_report(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<(StatusCode, Json<SaveReportResponse>), ApiError> {
    let event = CallEvent::from_slice(&body)?;
    debug!(
        event_type = %event.event_type,
        body_len = body.len(),
        "call event accepted"
    );

    let outcome = tokio::spawn(async move { ingest::process_call_event(&state, event).await })
        .await
        .map_err(|e| ApiError::internal(SAVE_FAILED, e))?
        .map_err(|e| ApiError::internal(SAVE_FAILED, e))?;

    let message = if outcome.replayed {
        REPLAYED_MESSAGE
    } else {
        SAVED_MESSAGE
    };

    Ok((
        StatusCode::CREATED,
        Json(SaveReportResponse {
            success: true,
            message,
            data: outcome.report,
            mood_analysis: outcome.judgment,
        }),
    ))
}

pub async fn save_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed(SAVE_METHOD_NOT_ALLOWED)
}

/// Raw query-string values; validated by [`PageRequest::parse`].
#[derive(Debug, Default, Deserialize)]
pub struct ReportQuery {
    pub phone_number: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub sort: Option<String>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportListResponse {
    pub success: bool,
    pub message: &'static str,
    pub data: Vec<CallReport>,
    pub pagination: Pagination,
}

pub async fn get_phone_call_reports(
    user: AuthUser,
    State(state): State<AppState>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<Json<ReportListResponse>, ApiError> {
    let Query(query) = query?;
    let request = PageRequest::parse(
        query.page.as_deref(),
        query.limit.as_deref(),
        query.sort.as_deref(),
        state.default_page_size,
    )?;

    let phone_number = query
        .phone_number
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PHONE_NUMBER);

    let page = state
        .db
        .list_reports_for_phone(phone_number, request)
        .await
        .map_err(|e| ApiError::internal(LIST_FAILED, e))?;

    let pagination = Pagination::new(&request, page.total_count);
    info!(
        user_sub = %user.sub,
        page = pagination.page,
        limit = pagination.limit,
        sort = %request.sort,
        returned = page.reports.len(),
        total_count = pagination.total_count,
        "call reports listed"
    );

    AuditEvent::new(
        AuditAction::ReportsListed,
        "phone_call_report",
        "*",
        user.sub,
    )
    .with_details(json!({
        "page": pagination.page,
        "limit": pagination.limit,
        "returned": page.reports.len(),
    }))
    .emit();

    Ok(Json(ReportListResponse {
        success: true,
        message: RETRIEVED_MESSAGE,
        data: page.reports,
        pagination,
    }))
}

pub async fn list_method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed(LIST_METHOD_NOT_ALLOWED)
}
