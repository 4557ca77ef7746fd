//! # solidnotify-core
//!
//! Core types, errors, and configuration for solidnotify.
//!
//! This crate provides the pieces shared by the client library and the CLI:
//!
//! - **Types**: topics, feature options, and the negotiation wire documents
//! - **Errors**: fetch failures, capability gaps, and contract violations
//! - **Configuration**: loading, validation, and persistence of the JSON5 config file

pub mod config;
pub mod env;
pub mod error;
pub mod paths;
pub mod types;

// Re-exports for convenience
pub use config::NotifyConfig;
pub use error::{ConfigError, FetchError, NotImplementedError, NotSupported, ProblemDetails};
pub use types::*;
