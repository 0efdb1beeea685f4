//! Vigilance Replay - Main Entry Point

use anyhow::Context;
use clap::Parser;
use replay::{init_logging, replay, OutputFormat, ReplaySettings};
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::{info, Level};

#[derive(Parser)]
#[command(name = "vigilance-replay", version, about = "Replay recorded frames through the vigilance pipeline")]
struct Cli {
    /// JSON-lines input (stdin when omitted)
    #[arg(long)]
    input: Option<PathBuf>,

    /// TOML or JSON settings file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Per-frame output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Maximum log level
    #[arg(long, default_value = "info")]
    log_level: Level,

    /// Log as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level, cli.log_json);

    info!("=== Vigilance Replay v{} ===", env!("CARGO_PKG_VERSION"));

    let settings = ReplaySettings::load(cli.config.as_deref()).context("failed to load settings")?;
    let mut stdout = tokio::io::stdout();

    let summary = match &cli.input {
        Some(path) => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open {}", path.display()))?;
            replay(BufReader::new(file), &mut stdout, settings, cli.format).await?
        }
        None => replay(BufReader::new(tokio::io::stdin()), &mut stdout, settings, cli.format).await?,
    };

    info!("Summary: {}", serde_json::to_string(&summary)?);
    Ok(())
}
