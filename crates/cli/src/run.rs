//! Target run: config → sink → driver → checkpoint.

use std::path::Path;

use anyhow::{Context, Result};
use config_loader::ConfigLoader;
use contracts::TargetConfig;
use dispatcher::{create_sink, SinkKind};
use engine::{emit_checkpoint, Driver};
use ingestion::LineSource;
use tracing::{info, warn};

use crate::cli::Cli;
use crate::usage;

/// Execute the target over stdin
///
/// The config is validated before the usage ping is spawned, so a rejected config never reports usage.
pub async fn run_target(cli: &Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;

    info!(
        api_url = %config.api_url,
        batch_size = config.batch_size(),
        timeout = ?config.request_timeout(),
        "Configuration loaded"
    );

    if !config.disable_collection {
        usage::spawn_usage_stats();
    }

    let kind = if cli.dry_run {
        info!("Dry run mode - payloads are logged, not sent");
        SinkKind::Log
    } else {
        SinkKind::Rest
    };
    let sink = create_sink(&config, kind).context("Failed to create sink")?;

    let mut driver = Driver::from_config(sink, &config);
    let outcome = driver
        .run(LineSource::stdin())
        .await
        .context("Pipeline execution failed")?;

    let mut stdout = tokio::io::stdout();
    emit_checkpoint(&mut stdout, outcome.checkpoint.as_ref())
        .await
        .context("Failed to write state")?;

    let delivery = driver.sender().metrics();
    info!(
        records_sent = outcome.summary.records_sent,
        sends = outcome.summary.sends,
        bytes_sent = delivery.bytes_sent,
        "Exiting normally"
    );
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<TargetConfig> {
    match path {
        Some(path) => {
            info!(config = %path.display(), "Loading configuration");
            ConfigLoader::load_from_path(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))
        }
        None => {
            warn!("No config file given, using an empty configuration");
            ConfigLoader::empty().context("Invalid configuration")
        }
    }
}
