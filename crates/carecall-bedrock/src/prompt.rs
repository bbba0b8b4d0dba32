//! Prompt assembly for mood classification.
//!
//! The prompt carries a compact rendering of the patient's profile followed
//! by the call transcript. Every profile field appears as a labelled line;
//! fields the patient left blank read "Not specified".

use carecall_core::models::profile::PatientProfile;

/// System prompt sent with every classification request.
pub const SYSTEM_PROMPT: &str = "You are a mental health AI assistant. \
Analyze conversations and provide structured mood assessments.";

const NOT_SPECIFIED: &str = "Not specified";

/// Rendered in place of the profile block when no patient is known.
pub const NO_PATIENT_CONTEXT: &str =
    "No patient information available - analyzing conversation without patient context";

/// Rendered in place of an empty transcript.
pub const EMPTY_TRANSCRIPT: &str = "(No transcript was provided for this call.)";

/// Render the patient context block.
pub fn render_patient_context(profile: Option<&PatientProfile>) -> String {
    let Some(profile) = profile else {
        return NO_PATIENT_CONTEXT.to_string();
    };

    let fields = [
        ("Age", &profile.age),
        ("Gender", &profile.gender),
        ("Occupation", &profile.occupation),
        ("Relationship Status", &profile.relationship_status),
        ("Living Situation", &profile.living_situation),
        ("Mental Health Diagnosis", &profile.mental_health_diagnosis),
        ("Therapy History", &profile.therapy_history),
        ("Psychiatric Medication", &profile.psychiatric_medication),
        ("Mental Health Hospitalization", &profile.mental_health_hospitalization),
        ("Past Self-Harm Thoughts", &profile.past_self_harm_thoughts),
        ("Current Self-Harm Thoughts", &profile.current_self_harm_thoughts),
        ("Current Mental Health Status", &profile.additional_info),
    ];

    let mut block = String::from("Patient Information:\n");
    for (label, value) in fields {
        let value = value.as_deref().unwrap_or(NOT_SPECIFIED);
        block.push_str(&format!("- {label}: {value}\n"));
    }
    block.pop();
    block
}

/// Build the user prompt for one call.
pub fn build_mood_prompt(profile: Option<&PatientProfile>, transcript: &str) -> String {
    let context = render_patient_context(profile);
    let transcript = if transcript.trim().is_empty() {
        EMPTY_TRANSCRIPT
    } else {
        transcript
    };

    format!(
        "You are a mental health AI assistant analyzing a phone call transcript to assess \
the patient's emotional state and mood.

{context}

Phone Call Transcript:
{transcript}

Please analyze this conversation and provide:
1. A mood rating from 1-5 (1 = very negative, 5 = very positive)
2. A detailed mood description explaining the emotional state
3. A list of specific emotions detected (e.g., anxiety, sadness, hope, frustration, etc.)

Focus on the emotional indicators in the conversation, the patient's tone, and any \
expressed feelings or concerns."
    )
}
