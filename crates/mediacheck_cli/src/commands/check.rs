//! The `check` command: scan, report and optionally repair.

use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use tracing::info;

use mediacheck_core::{
    AuditReport, MediaCheckConfig, PlaceholderReport, create_placeholders, run_audit,
};
use mediacheck_db::MediaDb;

use crate::output::Output;

#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Create empty placeholder files for missing entries
    pub fix_placeholders: bool,
    /// Restrict to these model labels (all when empty)
    pub models: Vec<String>,
    /// Print the report as JSON instead of text
    pub json: bool,
    /// Return an error when missing files remain
    pub fail_on_missing: bool,
}

#[derive(Serialize)]
struct CheckJson<'a> {
    ok: bool,
    report: &'a AuditReport,
    placeholders: Option<&'a PlaceholderReport>,
}

/// Run the audit and print the result.
///
/// Returns the report and placeholder outcomes so callers (and tests) can
/// inspect what happened; the error cases are placeholder failures and,
/// with `fail_on_missing`, unrepaired missing files.
pub async fn run(
    config: &MediaCheckConfig,
    options: &CheckOptions,
    output: &Output,
) -> Result<(AuditReport, Option<PlaceholderReport>)> {
    config.validate()?;
    let models = config.select_models(&options.models)?;

    let db = MediaDb::open(&config.database.path).await?;
    let audited = run_audit(&db, &config.media_root, &models).await;
    db.close().await;
    let report = audited?;

    if !options.json {
        print_report(&report, output);
    }

    let placeholders = if options.fix_placeholders && !report.is_clean() {
        if !options.json {
            output.status("Creating placeholder files for missing entries...");
        }
        let placeholders = create_placeholders(&report.missing).await;
        if !options.json {
            print_placeholders(&placeholders, output);
        }
        Some(placeholders)
    } else {
        None
    };

    let failed = placeholders
        .as_ref()
        .map(|p| p.failures().count())
        .unwrap_or(0);
    let unrepaired = !report.is_clean() && placeholders.is_none();

    if options.json {
        let json = serde_json::to_string_pretty(&CheckJson {
            ok: failed == 0 && !(options.fail_on_missing && unrepaired),
            report: &report,
            placeholders: placeholders.as_ref(),
        })
        .into_diagnostic()?;
        output.print(&json);
    }

    if failed > 0 {
        return Err(miette::miette!(
            "{} placeholder file(s) could not be created",
            failed
        ));
    }

    if options.fail_on_missing && unrepaired {
        return Err(miette::miette!(
            "{} referenced media file(s) are missing",
            report.missing_count()
        ));
    }

    info!("Check finished");
    Ok((report, placeholders))
}

fn print_report(report: &AuditReport, output: &Output) {
    output.section("Media check summary");
    output.print(&format!(
        "Total referenced file fields scanned (approx): {}",
        report.scanned
    ));
    output.print(&format!("Missing files: {}", report.missing_count()));
    if report.skipped_empty > 0 || report.skipped_unreadable > 0 {
        output.print(&format!(
            "Skipped: {} empty, {} unreadable",
            report.skipped_empty, report.skipped_unreadable
        ));
    }

    if report.is_clean() {
        output.success("All referenced media files were present on disk.");
        return;
    }

    output.print("List of missing files:");
    for entry in &report.missing {
        output.list_item(&entry.to_string());
    }
}

fn print_placeholders(placeholders: &PlaceholderReport, output: &Output) {
    for (path, error) in placeholders.failures() {
        output.error(&format!(
            "Failed to create placeholder {}: {}",
            path.display(),
            error
        ));
    }

    if placeholders.already_present() > 0 {
        output.status(&format!(
            "{} placeholder path(s) already existed and were left untouched",
            placeholders.already_present()
        ));
    }

    if placeholders.has_failures() {
        output.warning(&format!(
            "Placeholders created: {}, failed: {}",
            placeholders.created(),
            placeholders.failures().count()
        ));
    } else {
        output.success("Placeholders created.");
    }
}
