//! Core of the media reference audit.
//!
//! Walks the configured file-reference fields of every configured model,
//! joins each stored path onto the media root and reports the ones
//! that are missing on disk. Missing files can optionally be replaced by
//! zero-byte placeholders.

pub mod audit;
pub mod config;
pub mod error;
pub mod placeholder;
pub mod resolve;
pub mod source;

pub use audit::{AuditReport, MissingEntry, run_audit, validate_models};
pub use config::{DatabaseConfig, MediaCheckConfig, ModelConfig};
pub use error::{AuditError, ConfigError, Result};
pub use placeholder::{
    PlaceholderOutcome, PlaceholderReport, PlaceholderResult, create_placeholder,
    create_placeholders,
};
pub use resolve::{expected_path, stays_within_root};
pub use source::ReferenceSource;

pub use mediacheck_db::{RecordId, ReferenceRow, StoredValue};
