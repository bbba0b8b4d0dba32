use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use super::mood::{MoodJudgment, MoodScore};

/// A persisted mood assessment for one processed call (`phone_call_reports` row).
///
/// Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CallReport {
    pub id: Uuid,
    pub user_id: String,
    /// Source conversation id, used to recognise replayed webhook deliveries.
    pub conversation_id: Option<String>,
    #[ts(type = "number")]
    pub mood: MoodScore,
    pub mood_description: String,
    pub emotions: Vec<String>,
    pub created_at: jiff::Timestamp,
}

impl CallReport {
    /// The judgment this report was written from.
    pub fn judgment(&self) -> MoodJudgment {
        MoodJudgment {
            mood: self.mood,
            mood_description: self.mood_description.clone(),
            emotions: self.emotions.clone(),
        }
    }
}

/// Everything the writer needs to create a report; the id and creation
/// timestamp are assigned at write time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCallReport {
    pub user_id: String,
    pub conversation_id: Option<String>,
    pub judgment: MoodJudgment,
}
