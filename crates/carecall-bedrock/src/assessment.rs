//! Mood assessment with a fixed fallback.
//!
//! A single classification attempt is made per call. Whatever comes back is
//! repaired field by field into a [`MoodJudgment`]; a failed, timed-out, or
//! non-object response yields [`MoodJudgment::fallback`]. Assessment never
//! returns an error.

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use carecall_core::models::mood::{
    DEFAULT_MOOD, FALLBACK_MOOD_DESCRIPTION, MoodJudgment, MoodScore,
};
use carecall_core::models::profile::PatientProfile;

use crate::classifier::MoodClassifier;
use crate::error::BedrockError;
use crate::prompt::build_mood_prompt;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy)]
pub struct AssessmentSettings {
    /// Upper bound on a single classification call.
    pub timeout: Duration,
}

impl Default for AssessmentSettings {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

/// How the recorded judgment was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssessmentSource {
    /// The model's answer conformed to the schema.
    Model,
    /// The model answered but at least one field was replaced by its default.
    Repaired,
    /// The call failed or the answer was unusable.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoodAssessment {
    pub judgment: MoodJudgment,
    pub source: AssessmentSource,
}

impl MoodAssessment {
    fn fallback() -> Self {
        Self {
            judgment: MoodJudgment::fallback(),
            source: AssessmentSource::Fallback,
        }
    }
}

/// Coerce a raw classifier response into a judgment.
///
/// Each field falls back to its default independently. Returns
/// [`BedrockError::SchemaViolation`] only when the response is not a JSON
/// object at all.
pub fn repair_judgment(raw: &Value) -> Result<(MoodJudgment, bool), BedrockError> {
    let Some(object) = raw.as_object() else {
        return Err(BedrockError::SchemaViolation(format!(
            "expected an object, got {}",
            json_kind(raw)
        )));
    };

    let mut repaired = false;

    let mood = match object.get("mood").and_then(mood_score) {
        Some(mood) => mood,
        None => {
            repaired = true;
            DEFAULT_MOOD
        }
    };

    let mood_description = match object.get("mood_description").and_then(Value::as_str) {
        Some(text) if !text.trim().is_empty() => text.to_string(),
        _ => {
            repaired = true;
            FALLBACK_MOOD_DESCRIPTION.to_string()
        }
    };

    let emotions = match object.get("emotions").and_then(Value::as_array) {
        Some(items) => {
            let tags: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_string))
                .collect();
            tags.unwrap_or_else(|| {
                repaired = true;
                Vec::new()
            })
        }
        None => {
            repaired = true;
            Vec::new()
        }
    };

    if object.len() > 3 {
        // Extra keys are dropped, not treated as a failure.
        repaired = true;
    }

    Ok((
        MoodJudgment {
            mood,
            mood_description,
            emotions,
        },
        repaired,
    ))
}

/// Assess the mood expressed in `transcript`, using `profile` as context.
pub async fn assess_mood(
    classifier: &dyn MoodClassifier,
    profile: Option<&PatientProfile>,
    transcript: &str,
    settings: &AssessmentSettings,
) -> MoodAssessment {
    let prompt = build_mood_prompt(profile, transcript);

    let raw = match tokio::time::timeout(settings.timeout, classifier.classify(&prompt)).await {
        Ok(Ok(raw)) => raw,
        Ok(Err(e)) => {
            warn!(error = %e, "mood classification failed, using fallback judgment");
            return MoodAssessment::fallback();
        }
        Err(_) => {
            warn!(
                error = %BedrockError::Timeout(settings.timeout),
                "mood classification failed, using fallback judgment"
            );
            return MoodAssessment::fallback();
        }
    };

    match repair_judgment(&raw) {
        Ok((judgment, false)) => {
            debug!(mood = judgment.mood.get(), "mood classified");
            MoodAssessment {
                judgment,
                source: AssessmentSource::Model,
            }
        }
        Ok((judgment, true)) => {
            warn!(
                mood = judgment.mood.get(),
                "mood classification partially malformed, defaults substituted"
            );
            MoodAssessment {
                judgment,
                source: AssessmentSource::Repaired,
            }
        }
        Err(e) => {
            warn!(error = %e, "mood classification failed, using fallback judgment");
            MoodAssessment::fallback()
        }
    }
}

/// An integer in range, written either as `4` or `4.0`.
fn mood_score(value: &Value) -> Option<MoodScore> {
    if let Some(n) = value.as_i64() {
        return MoodScore::new(n);
    }
    value
        .as_f64()
        .filter(|n| n.fract() == 0.0)
        .and_then(|n| MoodScore::new(n as i64))
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
