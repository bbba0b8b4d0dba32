pub mod call_reports;
pub mod health;
pub mod user_info;
