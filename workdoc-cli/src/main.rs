//! WorkDoc360 operator CLI
//!
//! Loads `.env` and the TOML config, opens the SQLite store and runs one
//! command. Results go to stdout as pretty JSON; logs go to stderr.

mod cli;
mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use cli::Cli;
use workdoc_app::AppConfig;

const DEFAULT_DB_FILE: &str = "workdoc.db";

#[tokio::main]
async fn main() -> ExitCode {
    // .env 不存在时忽略
    let dotenv = dotenvy::dotenv();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!("Loaded environment from {}", path.display());
    }

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = AppConfig::load(cli.config.as_deref())?;
    let db_path = cli
        .database
        .or_else(|| config.database.path.clone())
        .unwrap_or_else(default_db_path);

    commands::execute(cli.command, &config, &db_path).await
}

/// `<data dir>/workdoc360/workdoc.db`, or the working directory when the
/// platform has no data directory.
fn default_db_path() -> PathBuf {
    dirs::data_dir().map_or_else(
        || PathBuf::from(DEFAULT_DB_FILE),
        |dir| dir.join("workdoc360").join(DEFAULT_DB_FILE),
    )
}
