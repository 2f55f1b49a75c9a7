//! # snapdiff-core
//!
//! Shared kernel of the snapdiff pipeline: domain types, YAML configuration,
//! error types, and the [`tool::ExternalTool`] capability every stage uses to
//! drive external binaries.

pub mod config;
pub mod error;
pub mod tool;
pub mod types;

pub use config::Config;
pub use error::ConfigError;
