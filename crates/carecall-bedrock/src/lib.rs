//! carecall-bedrock
//!
//! Mood assessment of call transcripts: prompt construction, the
//! classification capability, its Bedrock implementation, and the
//! fallback/repair policy applied to whatever the model returns.

pub mod assessment;
pub mod classifier;
pub mod client;
pub mod error;
pub mod prompt;
pub mod schema;
