use std::sync::Arc;

use clap::{Parser, Subcommand};
use movie_rerank::{
    api::{create_router, AppState},
    services::{render_report, RecommendationEngine},
    Config,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Re-ranks baseline movie recommendations")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum Command {
    /// Serve recommendations over HTTP
    #[default]
    Serve,
    /// Print recommendations for every known user and exit
    Report,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("movie_rerank=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    // Everything is loaded up front; a missing rating file stops here
    let engine = Arc::new(RecommendationEngine::from_config(&config)?);

    match args.command.unwrap_or_default() {
        Command::Report => {
            let report = engine.recommend_for_all_users().await?;
            print!("{}", render_report(&report));
        }
        Command::Serve => {
            let app = create_router(AppState::from(engine));
            let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
            tracing::info!(address = %config.bind_address(), "Server listening");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
