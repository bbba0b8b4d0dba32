use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use carecall_bedrock::classifier::BedrockMoodClassifier;
use carecall_lambda::config::Config;
use carecall_lambda::state::AppState;
use carecall_storage::Database;

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Structured JSON logging for CloudWatch
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let config = Config::from_env()?;
    let db = Database::open(&config.database_path)?;

    let bedrock = carecall_bedrock::client::build_client().await;
    let classifier = BedrockMoodClassifier::new(bedrock, &config.model_id, config.max_tokens);
    tracing::info!(
        model_id = classifier.model_id(),
        timeout_secs = config.classifier_timeout.as_secs(),
        "mood classifier configured"
    );

    let state = AppState::new(db, Arc::new(classifier), &config);
    let app = carecall_lambda::router(state);

    lambda_http::run(app).await.map_err(|e| eyre::eyre!(e))
}
