use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use courselens_common::observability::{init_logging, LogConfig};
use courselens_config::CatalogConfigLoader;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

mod batch;
mod run;

/// Course catalog metadata extractor.
#[derive(Parser, Debug)]
#[command(name = "courselens", version, about)]
struct Cli {
    /// Catalog configuration file (JSON or YAML).
    #[arg(short, long, default_value = "courselens.yaml", env = "COURSELENS_CONFIG")]
    config: PathBuf,

    /// Restrict the run to these content types; all configured types when
    /// empty.
    #[arg(short = 't', long = "content-type")]
    content_types: Vec<String>,

    /// Run the browser with a visible window.
    #[arg(long)]
    no_headless: bool,

    /// Log directory override.
    #[arg(long, env = "COURSELENS_LOG_DIR")]
    log_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_path = init_logging(LogConfig {
        log_dir: cli.log_dir.clone(),
        ..LogConfig::default()
    })?;
    info!(target: "app", log = %log_path.display(), config = %cli.config.display(), "starting");

    let mut cfg = CatalogConfigLoader::new().with_file(&cli.config).load()?;
    if cli.no_headless {
        cfg.settings.headless = false;
    }

    // Ctrl-C requests a stop at the next item boundary.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!(target: "app", "interrupt received; finishing current item");
            signal_token.cancel();
        }
    });

    run::execute(cfg, &cli.content_types, cancel).await
}
