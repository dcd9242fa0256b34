//! Scan-and-report.
//!
//! For every configured model, for every file field, for every record: join
//! the stored path onto the media root and check it exists. Empty values and
//! values that cannot be read are skipped and counted, never reported as
//! missing.

use std::path::{Path, PathBuf};

use mediacheck_db::{RecordId, StoredValue};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::ModelConfig;
use crate::error::Result;
use crate::resolve::expected_path;
use crate::source::ReferenceSource;

/// A stored file reference whose file is not on disk.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissingEntry {
    /// Model label
    pub model: String,

    /// Primary key of the record
    pub id: RecordId,

    /// Field holding the reference
    pub field: String,

    /// Value as stored in the database
    pub stored: String,

    /// Where the file was expected
    pub path: PathBuf,
}

impl std::fmt::Display for MissingEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}[pk={}].{} -> {} (expected on disk: {})",
            self.model,
            self.id,
            self.field,
            self.stored,
            self.path.display()
        )
    }
}

/// Result of one audit run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct AuditReport {
    /// Every (record, field) pair visited
    pub scanned: u64,

    /// Pairs whose file exists
    pub present: u64,

    /// Pairs with a NULL or empty value
    pub skipped_empty: u64,

    /// Pairs whose value could not be read
    pub skipped_unreadable: u64,

    /// Missing files, in scan order
    pub missing: Vec<MissingEntry>,
}

impl AuditReport {
    /// Number of missing entries.
    pub fn missing_count(&self) -> usize {
        self.missing.len()
    }

    /// True when nothing is missing.
    pub fn is_clean(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fold another report into this one.
    pub fn merge(&mut self, other: AuditReport) {
        self.scanned += other.scanned;
        self.present += other.present;
        self.skipped_empty += other.skipped_empty;
        self.skipped_unreadable += other.skipped_unreadable;
        self.missing.extend(other.missing);
    }
}

/// Check every model against the source before anything is scanned.
pub async fn validate_models<S>(source: &S, models: &[ModelConfig]) -> Result<()>
where
    S: ReferenceSource + ?Sized,
{
    for model in models {
        source.check_model(model).await?;
    }
    Ok(())
}

/// Run the audit over `models`.
///
/// Models are validated first, so a configuration mistake aborts before any
/// partial report is produced.
pub async fn run_audit<S>(
    source: &S,
    media_root: &Path,
    models: &[ModelConfig],
) -> Result<AuditReport>
where
    S: ReferenceSource + ?Sized,
{
    validate_models(source, models).await?;

    if !media_root.is_dir() {
        warn!(
            "Media root {} is not a directory; every reference will be reported missing",
            media_root.display()
        );
    }

    let mut report = AuditReport::default();
    for model in models {
        let model_report = audit_model(source, media_root, model).await?;
        info!(
            "{}: {} scanned, {} missing",
            model.label,
            model_report.scanned,
            model_report.missing_count()
        );
        report.merge(model_report);
    }

    info!(
        "Audit complete: {} scanned, {} present, {} missing, {} empty, {} unreadable",
        report.scanned,
        report.present,
        report.missing_count(),
        report.skipped_empty,
        report.skipped_unreadable
    );
    Ok(report)
}

async fn audit_model<S>(
    source: &S,
    media_root: &Path,
    model: &ModelConfig,
) -> Result<AuditReport>
where
    S: ReferenceSource + ?Sized,
{
    let rows = source.scan_model(model).await?;
    let mut report = AuditReport::default();

    for (idx, field) in model.file_fields.iter().enumerate() {
        for row in &rows {
            report.scanned += 1;

            let stored = match row.values.get(idx) {
                Some(StoredValue::Path(stored)) => stored,
                Some(StoredValue::Empty) => {
                    report.skipped_empty += 1;
                    continue;
                }
                Some(StoredValue::Unreadable(reason)) => {
                    debug!(
                        "Skipping {}[pk={}].{}: {}",
                        model.label, row.id, field, reason
                    );
                    report.skipped_unreadable += 1;
                    continue;
                }
                None => {
                    debug!(
                        "Skipping {}[pk={}].{}: no value returned",
                        model.label, row.id, field
                    );
                    report.skipped_unreadable += 1;
                    continue;
                }
            };

            let path = expected_path(media_root, stored);
            if file_exists(&path).await {
                report.present += 1;
            } else {
                report.missing.push(MissingEntry {
                    model: model.label.clone(),
                    id: row.id.clone(),
                    field: field.clone(),
                    stored: stored.clone(),
                    path,
                });
            }
        }
    }

    Ok(report)
}

async fn file_exists(path: &Path) -> bool {
    match tokio::fs::try_exists(path).await {
        Ok(exists) => exists,
        Err(e) => {
            warn!("Could not check {}: {}", path.display(), e);
            false
        }
    }
}
