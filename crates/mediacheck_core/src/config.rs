//! Configuration for mediacheck
//!
//! The audit does not reflect over an ORM. Instead the models and their
//! file-reference fields are listed explicitly in a TOML file:
//!
//! ```toml
//! media_root = "media"
//!
//! [database]
//! path = "db.sqlite3"
//!
//! [[models]]
//! label = "library.Book"
//! table = "library_book"
//! file_fields = ["cover", "attachment"]
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{AuditError, ConfigError};

/// Database configuration for SQLite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Path to the application's database file.
    pub path: PathBuf,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("db.sqlite3"),
        }
    }
}

/// A data model and the columns on it that store file paths.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Label used in reports, e.g. `library.Book`
    pub label: String,

    /// Backing table
    pub table: String,

    /// Primary key column
    #[serde(default = "default_primary_key")]
    pub primary_key: String,

    /// Columns holding paths relative to the media root
    pub file_fields: Vec<String>,
}

fn default_primary_key() -> String {
    "id".to_string()
}

impl ModelConfig {
    pub fn new(
        label: impl Into<String>,
        table: impl Into<String>,
        file_fields: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            label: label.into(),
            table: table.into(),
            primary_key: default_primary_key(),
            file_fields: file_fields.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_primary_key(mut self, primary_key: impl Into<String>) -> Self {
        self.primary_key = primary_key.into();
        self
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaCheckConfig {
    /// Base directory stored paths are resolved against.
    pub media_root: PathBuf,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub models: Vec<ModelConfig>,
}

impl MediaCheckConfig {
    /// Check the configuration for values the audit cannot work with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.media_root.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("media_root".to_string()));
        }
        if self.database.path.as_os_str().is_empty() {
            return Err(ConfigError::MissingField("database.path".to_string()));
        }
        if self.models.is_empty() {
            return Err(ConfigError::invalid_value(
                "models",
                "at least one model must be configured",
            ));
        }

        let mut labels = HashSet::new();
        for (idx, model) in self.models.iter().enumerate() {
            if model.label.trim().is_empty() {
                return Err(ConfigError::MissingField(format!("models[{}].label", idx)));
            }
            if model.table.trim().is_empty() {
                return Err(ConfigError::MissingField(format!("models[{}].table", idx)));
            }
            if model.primary_key.trim().is_empty() {
                return Err(ConfigError::MissingField(format!(
                    "models[{}].primary_key",
                    idx
                )));
            }
            if !labels.insert(model.label.as_str()) {
                return Err(ConfigError::invalid_value(
                    format!("models[{}].label", idx),
                    format!("duplicate model label {}", model.label),
                ));
            }
            if model.file_fields.is_empty() {
                return Err(ConfigError::invalid_value(
                    format!("models[{}].file_fields", idx),
                    format!("model {} lists no file fields", model.label),
                ));
            }

            let mut fields = HashSet::new();
            for field in &model.file_fields {
                if field.trim().is_empty() {
                    return Err(ConfigError::invalid_value(
                        format!("models[{}].file_fields", idx),
                        "empty field name",
                    ));
                }
                if !fields.insert(field.as_str()) {
                    return Err(ConfigError::invalid_value(
                        format!("models[{}].file_fields", idx),
                        format!("field {} listed twice", field),
                    ));
                }
            }
        }

        Ok(())
    }

    /// Models to audit. An empty selection means all of them.
    pub fn select_models(&self, labels: &[String]) -> Result<Vec<ModelConfig>, AuditError> {
        if labels.is_empty() {
            return Ok(self.models.clone());
        }

        labels
            .iter()
            .map(|label| {
                self.models
                    .iter()
                    .find(|m| &m.label == label)
                    .cloned()
                    .ok_or_else(|| AuditError::UnknownModel {
                        label: label.clone(),
                        available: self.models.iter().map(|m| m.label.clone()).collect(),
                    })
            })
            .collect()
    }

    /// Render as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::TomlSerialize(e.to_string()))
    }
}

/// Resolve a path relative to a base directory
/// If the path is absolute, return it as-is
/// If the path is relative, resolve it relative to the base directory
fn resolve_path(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Load configuration from a TOML file
///
/// Relative `media_root` and `database.path` are resolved against the
/// directory containing the file.
pub async fn load_config(path: &Path) -> Result<MediaCheckConfig, ConfigError> {
    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

    let mut config = parse_config(&content, path)?;

    let base_dir = path.parent().unwrap_or(Path::new("."));
    config.media_root = resolve_path(base_dir, &config.media_root);
    config.database.path = resolve_path(base_dir, &config.database.path);

    debug!(
        "Loaded config from {}: {} models",
        path.display(),
        config.models.len()
    );
    Ok(config)
}

/// Parse configuration text. `origin` is only used in error messages.
pub fn parse_config(content: &str, origin: &Path) -> Result<MediaCheckConfig, ConfigError> {
    toml::from_str(content).map_err(|e| ConfigError::TomlParse {
        path: origin.display().to_string(),
        message: e.to_string(),
    })
}

/// Standard config file locations
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    // Project-specific config
    paths.push(PathBuf::from("mediacheck.toml"));

    // User config directory
    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("mediacheck").join("config.toml"));
    }

    // Home directory fallback
    if let Some(home_dir) = dirs::home_dir() {
        paths.push(home_dir.join(".mediacheck").join("config.toml"));
    }

    paths
}

/// Load configuration from standard locations
pub async fn load_config_from_standard_locations() -> Result<MediaCheckConfig, ConfigError> {
    let paths = config_paths();
    for path in &paths {
        if path.exists() {
            return load_config(path).await;
        }
    }

    Err(ConfigError::NotFound {
        searched: paths.iter().map(|p| p.display().to_string()).collect(),
    })
}
