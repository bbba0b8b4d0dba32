use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("mood score out of range: {0}")]
    MoodOutOfRange(i64),
}
