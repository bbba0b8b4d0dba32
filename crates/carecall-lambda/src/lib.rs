//! carecall-lambda
//!
//! HTTP surface of the call-monitoring service: the call-report webhook,
//! the paginated report query, and the patient profile endpoints.

use axum::Router;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{HeaderName, Method};
use axum::middleware as axum_mw;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};

pub mod config;
pub mod error;
pub mod ingest;
pub mod middleware;
pub mod routes;
pub mod state;

use state::AppState;

/// Headers browsers may send cross-origin.
pub const ALLOWED_HEADERS: [HeaderName; 4] = [
    AUTHORIZATION,
    HeaderName::from_static("x-client-info"),
    HeaderName::from_static("apikey"),
    CONTENT_TYPE,
];

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(ALLOWED_HEADERS);

    // The CORS layer answers every OPTIONS request itself with a bare 200.
    Router::new()
        // Health (no auth)
        .route("/health", get(routes::health::health_check))
        // Webhook (no auth)
        .route(
            "/save-phone-call-report",
            post(routes::call_reports::save_phone_call_report)
                .fallback(routes::call_reports::save_method_not_allowed),
        )
        // Protected routes
        .route(
            "/get-phone-call-reports",
            get(routes::call_reports::get_phone_call_reports)
                .fallback(routes::call_reports::list_method_not_allowed),
        )
        .route(
            "/user-info",
            get(routes::user_info::get_user_info)
                .post(routes::user_info::save_user_info)
                .fallback(routes::user_info::method_not_allowed),
        )
        .layer(axum_mw::from_fn(middleware::audit::audit_log))
        .layer(cors)
        .with_state(state)
}
