mod commands;
mod output;

use clap::{Parser, Subcommand};
use miette::Result;
use std::path::PathBuf;
use tracing::info;

use mediacheck_core::config;

use crate::commands::check::CheckOptions;
use crate::output::Output;

#[derive(Parser)]
#[command(name = "mediacheck")]
#[command(about = "Check media files referenced by database file fields exist on disk")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(long, short = 'c', global = true)]
    config: Option<PathBuf>,

    /// Media root directory (overrides config)
    #[arg(long, global = true)]
    media_root: Option<PathBuf>,

    /// Database file path (overrides config)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that every referenced media file exists on disk
    Check {
        /// Create empty placeholder files for missing entries
        #[arg(long, alias = "fixplaceholders")]
        fix_placeholders: bool,

        /// Only check this model (by label); may be repeated
        #[arg(long = "model", value_name = "LABEL")]
        models: Vec<String>,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Exit with an error if missing files remain
        #[arg(long)]
        fail_on_missing: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Validate the configuration against the database schema
    Validate,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .rgb_colors(miette::RgbColors::Preferred)
                .with_cause_chain()
                .context_lines(5)
                .tab_width(2)
                .break_words(true)
                .build(),
        )
    }))?;
    miette::set_panic_hook();
    let cli = Cli::parse();

    use tracing_appender::rolling;
    use tracing_subscriber::{
        EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt,
    };

    // Create log directory in user's data directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mediacheck")
        .join("logs");

    std::fs::create_dir_all(&log_dir).ok();

    let file_appender = rolling::daily(&log_dir, "mediacheck.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = if cli.debug {
        EnvFilter::new("mediacheck=debug,mediacheck_core=debug,mediacheck_db=debug,sqlx=info,info")
    } else {
        EnvFilter::new("mediacheck=info,mediacheck_core=info,mediacheck_db=info,sqlx=warn,warn")
    };

    // Terminal logs go to stderr so stdout stays a clean report
    let terminal_layer = if cli.debug {
        fmt::layer()
            .with_file(true)
            .with_line_number(true)
            .with_writer(std::io::stderr)
            .pretty()
            .boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .compact()
            .boxed()
    };

    let file_env_filter =
        EnvFilter::new("mediacheck=debug,mediacheck_core=debug,mediacheck_db=debug,info");

    let file_layer = fmt::layer()
        .with_file(true)
        .with_line_number(true)
        .with_ansi(false)
        .with_writer(non_blocking);

    tracing_subscriber::registry()
        .with(terminal_layer.with_filter(env_filter))
        .with(file_layer.with_filter(file_env_filter))
        .init();

    info!(
        "Logging initialized. Logs are being written to: {:?}",
        log_dir.join("mediacheck.log")
    );

    // Load configuration
    let mut config = if let Some(config_path) = &cli.config {
        info!("Loading config from: {:?}", config_path);
        config::load_config(config_path).await?
    } else {
        info!("Loading config from standard locations");
        config::load_config_from_standard_locations().await?
    };

    if let Some(media_root) = cli.media_root {
        config.media_root = media_root;
    }
    if let Some(db_path) = cli.db_path {
        config.database.path = db_path;
    }

    let output = Output::new();

    match cli.command {
        Commands::Check {
            fix_placeholders,
            models,
            json,
            fail_on_missing,
        } => {
            let options = CheckOptions {
                fix_placeholders,
                models,
                json,
                fail_on_missing,
            };
            commands::check::run(&config, &options, &output).await?;
        }
        Commands::Config { cmd } => match cmd {
            ConfigCommands::Show => commands::config::show(&config, &output).await?,
            ConfigCommands::Validate => commands::config::validate(&config, &output).await?,
        },
    }

    Ok(())
}
