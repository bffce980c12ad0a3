pub mod activity_log;
pub mod error;
pub mod list;
