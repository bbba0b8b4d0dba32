//! The output schema the model is held to, expressed as a Converse tool.
//!
//! Bedrock constrains structured output through tool use: the request
//! declares a single tool whose input schema is the mood judgment and forces
//! the model to call it, so the judgment arrives as the tool's input
//! document.

use std::collections::HashMap;

use aws_sdk_bedrockruntime::types::{
    SpecificToolChoice, Tool, ToolChoice, ToolConfiguration, ToolInputSchema, ToolSpecification,
};
use aws_smithy_types::{Document, Number};
use serde_json::{Value, json};

use crate::error::BedrockError;

pub const TOOL_NAME: &str = "record_mood_analysis";

const TOOL_DESCRIPTION: &str = "Record the structured mood assessment for this phone call.";

/// JSON Schema for a mood judgment. All three fields are required and no
/// others are allowed.
pub fn mood_judgment_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "mood": {
                "type": "integer",
                "minimum": 1,
                "maximum": 5,
                "description": "Mood rating from 1 (very negative) to 5 (very positive)"
            },
            "mood_description": {
                "type": "string",
                "description": "Detailed description of the emotional state"
            },
            "emotions": {
                "type": "array",
                "items": { "type": "string" },
                "description": "List of specific emotions detected"
            }
        },
        "required": ["mood", "mood_description", "emotions"],
        "additionalProperties": false
    })
}

/// Tool configuration forcing the model to answer through [`TOOL_NAME`].
pub fn tool_configuration() -> Result<ToolConfiguration, BedrockError> {
    let spec = ToolSpecification::builder()
        .name(TOOL_NAME)
        .description(TOOL_DESCRIPTION)
        .input_schema(ToolInputSchema::Json(json_to_document(&mood_judgment_schema())))
        .build()
        .map_err(|e| BedrockError::Invocation(e.to_string()))?;

    let choice = SpecificToolChoice::builder()
        .name(TOOL_NAME)
        .build()
        .map_err(|e| BedrockError::Invocation(e.to_string()))?;

    ToolConfiguration::builder()
        .tools(Tool::ToolSpec(spec))
        .tool_choice(ToolChoice::Tool(choice))
        .build()
        .map_err(|e| BedrockError::Invocation(e.to_string()))
}

pub fn json_to_document(value: &Value) -> Document {
    match value {
        Value::Null => Document::Null,
        Value::Bool(b) => Document::Bool(*b),
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                Document::Number(Number::PosInt(u))
            } else if let Some(i) = n.as_i64() {
                Document::Number(Number::NegInt(i))
            } else {
                Document::Number(Number::Float(n.as_f64().unwrap_or_default()))
            }
        }
        Value::String(s) => Document::String(s.clone()),
        Value::Array(items) => Document::Array(items.iter().map(json_to_document).collect()),
        Value::Object(map) => Document::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), json_to_document(v)))
                .collect::<HashMap<_, _>>(),
        ),
    }
}

pub fn document_to_json(document: &Document) -> Value {
    match document {
        Document::Null => Value::Null,
        Document::Bool(b) => Value::Bool(*b),
        Document::Number(Number::PosInt(u)) => Value::from(*u),
        Document::Number(Number::NegInt(i)) => Value::from(*i),
        Document::Number(Number::Float(f)) => serde_json::Number::from_f64(*f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Document::String(s) => Value::String(s.clone()),
        Document::Array(items) => Value::Array(items.iter().map(document_to_json).collect()),
        Document::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), document_to_json(v)))
                .collect(),
        ),
    }
}
