use async_trait::async_trait;
use aws_sdk_bedrockruntime::Client;
use aws_sdk_bedrockruntime::types::{
    ContentBlock, ConversationRole, InferenceConfiguration, Message, SystemContentBlock,
};
use serde_json::Value;
use tracing::{debug, info};

use crate::error::BedrockError;
use crate::prompt::SYSTEM_PROMPT;
use crate::schema::{self, TOOL_NAME};

/// Sampling temperature for classification calls.
pub const TEMPERATURE: f32 = 0.3;

/// Default per-call output token budget.
pub const DEFAULT_MAX_TOKENS: i32 = 500;

/// A black-box mood classifier.
///
/// Returns the model's structured output as JSON. Conformance to the mood
/// schema is not guaranteed; callers repair or reject the value.
#[async_trait]
pub trait MoodClassifier: Send + Sync {
    async fn classify(&self, prompt: &str) -> Result<Value, BedrockError>;
}

/// Classifier backed by the Bedrock Converse API.
#[derive(Clone)]
pub struct BedrockMoodClassifier {
    client: Client,
    model_id: String,
    max_tokens: i32,
}

impl BedrockMoodClassifier {
    pub fn new(client: Client, model_id: impl Into<String>, max_tokens: i32) -> Self {
        Self {
            client,
            model_id: model_id.into(),
            max_tokens,
        }
    }

    pub fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[async_trait]
impl MoodClassifier for BedrockMoodClassifier {
    async fn classify(&self, prompt: &str) -> Result<Value, BedrockError> {
        let message = Message::builder()
            .role(ConversationRole::User)
            .content(ContentBlock::Text(prompt.to_string()))
            .build()
            .map_err(|e| BedrockError::Invocation(e.to_string()))?;

        let response = self
            .client
            .converse()
            .model_id(&self.model_id)
            .system(SystemContentBlock::Text(SYSTEM_PROMPT.to_string()))
            .messages(message)
            .inference_config(
                InferenceConfiguration::builder()
                    .max_tokens(self.max_tokens)
                    .temperature(TEMPERATURE)
                    .build(),
            )
            .tool_config(schema::tool_configuration()?)
            .send()
            .await
            .map_err(|e| BedrockError::Invocation(e.into_service_error().to_string()))?;

        if let Some(usage) = response.usage() {
            info!(
                model_id = %self.model_id,
                input_tokens = usage.input_tokens(),
                output_tokens = usage.output_tokens(),
                "mood classification complete"
            );
        }

        let output_message = response
            .output()
            .and_then(|o| o.as_message().ok())
            .ok_or_else(|| BedrockError::ResponseParse("no message in response".to_string()))?;

        // Forced tool choice means the judgment normally arrives as tool input.
        for block in output_message.content() {
            if let ContentBlock::ToolUse(tool_use) = block
                && tool_use.name() == TOOL_NAME
            {
                return Ok(schema::document_to_json(tool_use.input()));
            }
        }

        let text = output_message
            .content()
            .iter()
            .filter_map(|block| {
                if let ContentBlock::Text(text) = block {
                    Some(text.as_str())
                } else {
                    None
                }
            })
            .collect::<Vec<_>>()
            .join("");

        debug!(model_id = %self.model_id, text_len = text.len(), "model answered in text");

        if text.trim().is_empty() {
            return Err(BedrockError::ResponseParse(
                "response contained neither tool input nor text".to_string(),
            ));
        }

        serde_json::from_str(text.trim())
            .map_err(|e| BedrockError::ResponseParse(format!("response was not JSON: {e}")))
    }
}
