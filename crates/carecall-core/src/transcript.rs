//! Flattening of a call's turn sequence into prompt-ready dialogue text.

use crate::models::call_event::TranscriptTurn;

/// Render turns as `"<role>: <message>"` lines joined by `\n`, in call order.
///
/// An absent or empty transcript yields an empty string. A turn with no
/// message (tool activity only) renders with an empty message.
pub fn normalize_transcript(turns: Option<&[TranscriptTurn]>) -> String {
    let Some(turns) = turns else {
        return String::new();
    };

    turns
        .iter()
        .map(|turn| {
            format!(
                "{}: {}",
                turn.role.as_deref().unwrap_or_default(),
                turn.message.as_deref().unwrap_or_default()
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
