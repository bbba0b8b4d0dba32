pub mod call_event;
pub mod mood;
pub mod pagination;
pub mod profile;
pub mod report;
