//! TrueFrame Core Library
//!
//! This crate provides the domain models, error types and configuration
//! shared by the verification simulator, the feed and the command-line driver.

pub mod config;
pub mod constants;
pub mod error;
pub mod models;

// Re-export commonly used types
pub use config::{VerificationConfig, VerificationTimings};
pub use error::{AppError, ErrorMetadata, LogLevel};
