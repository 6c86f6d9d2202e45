pub mod config;
pub mod correspondents;
pub mod error;
pub mod telemetry;
