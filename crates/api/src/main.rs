use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::state::AppState;

mod cache;
mod cli;
mod config;
mod error;
mod metrics;
mod report;
mod routes;
mod state;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Cli::parse();
    init_tracing();

    let config = AppConfig::from_env().context("Failed to load configuration")?;
    let state = AppState::new(&config)?;

    if let Some(Command::Analyze { path }) = args.command {
        let reports = cli::analyze_path(&state, &path).await?;
        println!("{}", serde_json::to_string_pretty(&reports)?);
        return Ok(());
    }

    let app = routes::create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("Server listening on http://{addr}");

    axum::serve(listener, app).await?;
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);
    if json {
        subscriber.json().init();
    } else {
        subscriber.init();
    }
}
