//! # kiln-core
//!
//! Core library for the kiln CLI providing:
//! - Project answers (`kiln.yaml`) as an immutable, strongly typed config
//! - Hierarchical loading: file, then `KILN_*` environment overrides
//! - Identifier and placeholder validation run before any file is touched

pub mod config;
pub mod error;
pub mod types;
pub mod validate;

pub use config::ProjectConfig;
pub use error::{Error, Result};
pub use types::{
    CiConfig, DbType, DeploymentConfig, GitConfig, GitFailurePolicy, PackagesConfig, ProjectType,
};
pub use validate::validate_identifier;
