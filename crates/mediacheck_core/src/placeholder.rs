//! Zero-byte placeholder files for missing references.
//!
//! Each entry is handled on its own: a failure is recorded and the remaining
//! entries are still processed. Existing files are never overwritten.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::audit::MissingEntry;
use crate::resolve::stays_within_root;

/// What happened at one placeholder path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "error", rename_all = "snake_case")]
pub enum PlaceholderOutcome {
    /// An empty file was created
    Created,
    /// A file already exists at the path (created earlier in the same pass,
    /// or by someone else since the scan)
    AlreadyPresent,
    /// Directory or file creation failed
    Failed(String),
}

/// Outcome for a single missing entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlaceholderResult {
    /// Path the placeholder was written to (or would have been)
    pub path: PathBuf,

    /// What happened there
    pub outcome: PlaceholderOutcome,
}

/// Outcomes of one placeholder pass, in the order the entries were given.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PlaceholderReport {
    /// One result per missing entry
    pub results: Vec<PlaceholderResult>,
}

impl PlaceholderReport {
    /// Number of placeholders written by this pass.
    pub fn created(&self) -> usize {
        self.count(|o| matches!(o, PlaceholderOutcome::Created))
    }

    /// Number of entries whose file already existed when its turn came.
    pub fn already_present(&self) -> usize {
        self.count(|o| matches!(o, PlaceholderOutcome::AlreadyPresent))
    }

    /// Results that failed, with their error text.
    pub fn failures(&self) -> impl Iterator<Item = (&Path, &str)> {
        self.results.iter().filter_map(|r| match &r.outcome {
            PlaceholderOutcome::Failed(error) => Some((r.path.as_path(), error.as_str())),
            _ => None,
        })
    }

    /// True when at least one entry could not be repaired.
    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    fn count(&self, pred: impl Fn(&PlaceholderOutcome) -> bool) -> usize {
        self.results.iter().filter(|r| pred(&r.outcome)).count()
    }
}

/// Create a zero-byte file at `path`, creating parent directories as needed.
pub async fn create_placeholder(path: &Path) -> std::io::Result<PlaceholderOutcome> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    match tokio::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .await
    {
        Ok(_) => Ok(PlaceholderOutcome::Created),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(PlaceholderOutcome::AlreadyPresent),
        Err(e) => Err(e),
    }
}

/// Create placeholders for every missing entry, in order.
///
/// Entries whose stored value is absolute or climbs out of the media root
/// are recorded as failed and nothing is written for them.
pub async fn create_placeholders(entries: &[MissingEntry]) -> PlaceholderReport {
    let mut report = PlaceholderReport::default();

    for entry in entries {
        if !stays_within_root(&entry.stored) {
            warn!(
                "Not creating placeholder for {}: outside media root",
                entry
            );
            report.results.push(PlaceholderResult {
                path: entry.path.clone(),
                outcome: PlaceholderOutcome::Failed("outside media root".to_string()),
            });
            continue;
        }

        let outcome = match create_placeholder(&entry.path).await {
            Ok(outcome) => {
                debug!("Placeholder {}: {:?}", entry.path.display(), outcome);
                outcome
            }
            Err(e) => {
                warn!(
                    "Could not create placeholder for {} at {}: {}",
                    entry,
                    entry.path.display(),
                    e
                );
                PlaceholderOutcome::Failed(e.to_string())
            }
        };
        report.results.push(PlaceholderResult {
            path: entry.path.clone(),
            outcome,
        });
    }

    info!(
        "Placeholders: {} created, {} already present, {} failed",
        report.created(),
        report.already_present(),
        report.failures().count()
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use mediacheck_db::RecordId;
    use pretty_assertions::assert_eq;

    fn entry(id: i64, media_root: &Path, stored: &str) -> MissingEntry {
        MissingEntry {
            model: "library.Book".to_string(),
            id: RecordId::Int(id),
            field: "cover".to_string(),
            stored: stored.to_string(),
            path: media_root.join(stored),
        }
    }

    #[tokio::test]
    async fn test_creates_empty_file_and_directories() {
        let media = tempfile::tempdir().unwrap();
        let path = media.path().join("covers/2024/a.png");

        let outcome = create_placeholder(&path).await.unwrap();
        assert_eq!(outcome, PlaceholderOutcome::Created);

        let meta = tokio::fs::metadata(&path).await.unwrap();
        assert!(meta.is_file());
        assert_eq!(meta.len(), 0);
    }

    #[tokio::test]
    async fn test_never_overwrites() {
        let media = tempfile::tempdir().unwrap();
        let path = media.path().join("a.png");
        tokio::fs::write(&path, b"real image").await.unwrap();

        let outcome = create_placeholder(&path).await.unwrap();
        assert_eq!(outcome, PlaceholderOutcome::AlreadyPresent);
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"real image");
    }

    #[tokio::test]
    async fn test_shared_path_is_created_once() {
        let media = tempfile::tempdir().unwrap();
        let entries = vec![
            entry(1, media.path(), "shared/cover.png"),
            entry(2, media.path(), "shared/cover.png"),
        ];

        let report = create_placeholders(&entries).await;
        assert_eq!(report.created(), 1);
        assert_eq!(report.already_present(), 1);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let media = tempfile::tempdir().unwrap();
        // A regular file where a directory is needed.
        tokio::fs::write(media.path().join("blocked"), b"")
            .await
            .unwrap();

        let entries = vec![
            entry(1, media.path(), "blocked/a.png"),
            entry(2, media.path(), "covers/b.png"),
        ];

        let report = create_placeholders(&entries).await;
        assert!(report.has_failures());
        assert_eq!(report.created(), 1);

        let failed: Vec<_> = report.failures().map(|(path, _)| path.to_path_buf()).collect();
        assert_eq!(failed, vec![media.path().join("blocked/a.png")]);
        assert!(media.path().join("covers/b.png").is_file());
    }

    #[tokio::test]
    async fn test_outside_root_is_not_written() {
        let scratch = tempfile::tempdir().unwrap();
        let media = scratch.path().join("media");
        tokio::fs::create_dir_all(&media).await.unwrap();
        let absolute = scratch.path().join("elsewhere/abs.png");

        let mut outside_abs = entry(3, &media, "placeholder");
        outside_abs.stored = absolute.to_str().unwrap().to_string();
        outside_abs.path = media.join(&outside_abs.stored);

        let entries = vec![
            entry(1, &media, "../shared/gone.png"),
            entry(2, &media, "nodir/../covers/a.png"),
            outside_abs,
        ];

        let report = create_placeholders(&entries).await;
        let outcomes: Vec<_> = report.results.iter().map(|r| r.outcome.clone()).collect();
        assert_eq!(
            outcomes,
            vec![
                PlaceholderOutcome::Failed("outside media root".to_string()),
                PlaceholderOutcome::Created,
                PlaceholderOutcome::Failed("outside media root".to_string()),
            ]
        );
        assert!(!scratch.path().join("shared").exists());
        assert!(!absolute.exists());
        assert!(media.join("covers/a.png").is_file());
    }
}
