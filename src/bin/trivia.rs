use std::path::PathBuf;

use anyhow::Context;
use trivia_api::config::Settings;
use trivia_api::db;
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

use clap::Parser;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file, `trivia.toml` in the working directory by default
    #[clap(long)]
    config: Option<PathBuf>,
    #[clap(default_value = "all")]
    runner: Runner,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum Runner {
    /// Serve the API against an already migrated database
    Serve,
    /// Apply pending migrations and exit
    Migrate,
    /// Migrate, then serve
    All,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref())?;
    let pool = db::establish_connection(&settings.database)
        .await
        .context("Failed to connect to the database")?;

    if matches!(cli.runner, Runner::Migrate | Runner::All) {
        tracing::info!("Running db migrations...");
        db::run_migrations(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    match cli.runner {
        Runner::Migrate => pool.close().await,
        Runner::Serve | Runner::All => run_server(pool, &settings.server).await?,
    };
    Ok(())
}
