pub mod config;
pub mod format;
pub mod resilience;
pub mod time;
