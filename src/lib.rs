pub mod core;
pub mod facebook;
pub mod telemetry;
