//! # tote-config
//!
//! Configuration for the tote packaging pipeline: the declared build targets,
//! config file discovery and layering, validation, and resolution of the
//! package version that every bundle embeds.

pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod validation;

// Re-export main types
pub use config::*;
pub use discovery::{ConfigDiscovery, ConfigSource};
pub use error::*;
pub use manifest::{VersionString, resolve_version};
pub use validation::{ConfigValidator, FsValidator, SchemaValidator, validate_fs, validate_schema};
