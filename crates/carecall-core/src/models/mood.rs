use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::CoreError;

/// Lowest mood score a judgment may carry (very negative).
pub const MIN_MOOD: u8 = 1;
/// Highest mood score a judgment may carry (very positive).
pub const MAX_MOOD: u8 = 5;
/// Score used when no usable assessment is available.
pub const DEFAULT_MOOD: MoodScore = MoodScore(3);
/// Description used when no usable assessment is available.
pub const FALLBACK_MOOD_DESCRIPTION: &str = "Unable to analyze mood";

/// A mood rating, always within `MIN_MOOD..=MAX_MOOD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct MoodScore(u8);

impl MoodScore {
    /// Returns `None` when `value` falls outside the 1–5 scale.
    pub fn new(value: i64) -> Option<Self> {
        if (i64::from(MIN_MOOD)..=i64::from(MAX_MOOD)).contains(&value) {
            Some(Self(value as u8))
        } else {
            None
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for MoodScore {
    type Error = CoreError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(CoreError::MoodOutOfRange(value))
    }
}

impl From<MoodScore> for i64 {
    fn from(score: MoodScore) -> Self {
        i64::from(score.0)
    }
}

impl Default for MoodScore {
    fn default() -> Self {
        DEFAULT_MOOD
    }
}

/// Structured mood assessment derived from one call transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MoodJudgment {
    #[ts(type = "number")]
    pub mood: MoodScore,
    pub mood_description: String,
    pub emotions: Vec<String>,
}

impl MoodJudgment {
    /// The judgment recorded whenever the classifier cannot produce one:
    /// `{mood: 3, mood_description: "Unable to analyze mood", emotions: []}`.
    pub fn fallback() -> Self {
        Self {
            mood: DEFAULT_MOOD,
            mood_description: FALLBACK_MOOD_DESCRIPTION.to_string(),
            emotions: Vec::new(),
        }
    }

    pub fn is_fallback(&self) -> bool {
        *self == Self::fallback()
    }
}

impl Default for MoodJudgment {
    fn default() -> Self {
        Self::fallback()
    }
}
