mod cli;

use anyhow::Context;
use axum::Router;
use backend::AppState;
use backend::config::Config;
use backend::services::seed_characters;
use clap::Parser;
use cli::{Cli, Command};
use std::net::SocketAddr;
use tower_http::services::ServeDir;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = Config::from_env();
    let state = AppState::from_config(&config)
        .await
        .context("failed to initialise application state")?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            let router = Router::new().fallback_service(ServeDir::new(&cli.dist_dir));
            let addr = SocketAddr::new(cli.host, cli.port);
            tracing::info!("Listening on {}", addr);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("failed to bind {addr}"))?;
            let router = backend::init(router, state);
            axum::serve(listener, router).await?;
        }
        Command::Seed => {
            let report = seed_characters(state.db.as_ref()).await?;
            tracing::info!(
                "Seeded characters: {} created, {} updated",
                report.created,
                report.updated
            );
        }
        Command::Populate { names } => {
            for name in names {
                match state.admin.populate_by_name(&name).await {
                    Ok(outcome) if outcome.succeeded() => tracing::info!(
                        biography = outcome.biography,
                        persona = outcome.persona,
                        details = outcome.details,
                        "Populated {}",
                        outcome.character.name
                    ),
                    Ok(outcome) => {
                        tracing::warn!("Nothing found for {}", outcome.character.name)
                    }
                    Err(e) => tracing::error!("Failed to populate {}: {}", name, e),
                }
            }
        }
    }
    Ok(())
}
