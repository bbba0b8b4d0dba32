use aws_config::BehaviorVersion;

/// Load AWS configuration from the environment (region, credentials chain).
pub async fn load_config() -> aws_config::SdkConfig {
    aws_config::defaults(BehaviorVersion::latest()).load().await
}

/// Build a Bedrock runtime client from the ambient AWS configuration.
pub async fn build_client() -> aws_sdk_bedrockruntime::Client {
    let config = load_config().await;
    aws_sdk_bedrockruntime::Client::new(&config)
}
