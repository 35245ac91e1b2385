//! TrueFrame Infrastructure Library
//!
//! Shared infrastructure for TrueFrame binaries:
//! - Telemetry initialization (tracing subscriber)
//! - Error output formatting

#[cfg(feature = "observability-basic")]
pub mod telemetry;

pub mod error;

// Re-export commonly used types
#[cfg(feature = "observability-basic")]
pub use telemetry::{init_telemetry, shutdown_telemetry, LogFormat};

pub use error::ErrorResponse;
