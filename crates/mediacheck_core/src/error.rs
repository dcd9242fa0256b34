use mediacheck_db::DbError;
use miette::Diagnostic;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuditError>;

/// Configuration-specific errors
#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum ConfigError {
    #[error("IO error for {path}: {message}")]
    #[diagnostic(code(mediacheck_core::config_io))]
    Io { path: String, message: String },

    #[error("TOML parse error in {path}: {message}")]
    #[diagnostic(
        code(mediacheck_core::config_parse),
        help("See mediacheck.example.toml for the expected layout")
    )]
    TomlParse { path: String, message: String },

    #[error("TOML serialize error: {0}")]
    #[diagnostic(code(mediacheck_core::config_serialize))]
    TomlSerialize(String),

    #[error("Missing required field: {0}")]
    #[diagnostic(code(mediacheck_core::missing_field))]
    MissingField(String),

    #[error("Invalid value for field {field}: {reason}")]
    #[diagnostic(code(mediacheck_core::invalid_value))]
    InvalidValue { field: String, reason: String },

    #[error("No configuration file found")]
    #[diagnostic(
        code(mediacheck_core::config_not_found),
        help("Searched: {}. Pass --config <path> or create one of these files.", searched.join(", "))
    )]
    NotFound { searched: Vec<String> },
}

impl ConfigError {
    pub fn invalid_value(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Error, Diagnostic, Debug)]
pub enum AuditError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DbError),

    #[error("Table {table} for model {model} does not exist")]
    #[diagnostic(
        code(mediacheck_core::unknown_table),
        help("Check the `table` entry of model {model} against the database schema")
    )]
    UnknownTable { model: String, table: String },

    #[error("Column {column} not found on table {table} (model {model})")]
    #[diagnostic(
        code(mediacheck_core::unknown_column),
        help("Available columns: {}", available.join(", "))
    )]
    UnknownColumn {
        model: String,
        table: String,
        column: String,
        available: Vec<String>,
    },

    #[error("Model {label} is not configured")]
    #[diagnostic(
        code(mediacheck_core::unknown_model),
        help("Configured models: {}", available.join(", "))
    )]
    UnknownModel {
        label: String,
        available: Vec<String>,
    },
}
