//! The `config` commands: print the effective configuration, or check it
//! against the database.

use mediacheck_core::{MediaCheckConfig, validate_models};
use mediacheck_db::MediaDb;
use miette::Result;

use crate::output::Output;

/// Show the effective configuration (after overrides) as TOML.
pub async fn show(config: &MediaCheckConfig, output: &Output) -> Result<()> {
    output.section("Current Configuration");
    output.print("");

    let toml_str = config.to_toml_string()?;
    for line in toml_str.lines() {
        output.print(line);
    }

    Ok(())
}

/// Validate the configuration and check every model against the database.
pub async fn validate(config: &MediaCheckConfig, output: &Output) -> Result<()> {
    config.validate()?;

    output.info("Database:", &config.database.path.display().to_string());
    output.info("Media root:", &config.media_root.display().to_string());

    let db = MediaDb::open(&config.database.path).await?;
    let checked = validate_models(&db, &config.models).await;
    db.close().await;
    checked?;

    if !config.media_root.is_dir() {
        output.warning(&format!(
            "Media root {} does not exist or is not a directory",
            config.media_root.display()
        ));
    }

    let fields: usize = config.models.iter().map(|m| m.file_fields.len()).sum();
    output.success(&format!(
        "Configuration valid: {} models, {} file fields",
        config.models.len(),
        fields
    ));
    Ok(())
}
