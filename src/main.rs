//! Safina server binary entry point.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use safina::agent::AgentRunner;
use safina::config::AppConfig;
use safina::error::SafinaError;
use safina::provider::GoogleProvider;
use safina::server::{cors_layer, router, AppState};
use safina::tools::ToolRegistry;

/// Chat agent gateway serving `POST /chat`.
#[derive(Parser, Debug)]
#[command(name = "safina", version, about)]
struct Cli {
    /// Address to listen on.
    #[arg(long, env = "SAFINA_BIND", default_value = "0.0.0.0:8000")]
    bind: String,

    /// Increase log verbosity (debug level).
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        error!("{e}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();
}

async fn run(cli: Cli) -> Result<(), SafinaError> {
    let config = AppConfig::from_env()?;

    let search = config.search_capability();
    if !search.is_live() {
        warn!("TAVILY_API_KEY not found; the web search tool will report itself unavailable");
    }

    let provider = GoogleProvider::new(
        config.model.clone(),
        config.google_api_key.clone(),
        config.google_base_url.clone(),
    );
    let agent = AgentRunner::new(Arc::new(provider), ToolRegistry::new(search))
        .with_settings(config.generation_settings())
        .with_max_iterations(config.max_iterations);

    let app = router(AppState::new(Arc::new(agent)), cors_layer(&config.cors_origins)?);

    let listener = TcpListener::bind(&cli.bind).await?;
    info!(
        bind = %cli.bind,
        model = %config.model,
        origins = ?config.cors_origins,
        "safina listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("safina stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    info!("shutdown signal received");
}
