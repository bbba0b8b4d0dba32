use std::sync::Arc;

use carecall_auth::jwt::TokenVerifier;
use carecall_bedrock::assessment::AssessmentSettings;
use carecall_bedrock::classifier::MoodClassifier;
use carecall_storage::Database;

use crate::config::Config;

/// Shared application state, injected into all route handlers via Axum state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub classifier: Arc<dyn MoodClassifier>,
    pub tokens: Arc<TokenVerifier>,
    pub assessment: AssessmentSettings,
    pub default_page_size: u32,
}

impl AppState {
    pub fn new(db: Database, classifier: Arc<dyn MoodClassifier>, config: &Config) -> Self {
        Self {
            db,
            classifier,
            tokens: Arc::new(TokenVerifier::new(
                config.jwt_secret.as_bytes(),
                config.jwt_audience.as_deref(),
            )),
            assessment: AssessmentSettings {
                timeout: config.classifier_timeout,
            },
            default_page_size: config.default_page_size,
        }
    }
}
