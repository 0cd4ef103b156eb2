//! MedSetu server binary.
//!
//! Reads `config.toml` (or the path given with `--config`), opens the SQLite
//! database, and serves the JSON API under `/api`.

use std::path::PathBuf;

use clap::Parser;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "MedSetu pharmacy order server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "config.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let cfg = medsetu_server::load_config(&cli.config)?;

  medsetu_server::run(cfg).await
}
