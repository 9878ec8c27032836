//! Tootfeed Embed - HTTP server for sanitized Mastodon toot feeds.

use axum::http::{Method, Request};
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::Level;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use tootfeed_embed::{AppState, Config, router};

/// Render Mastodon toots as embeddable HTML.
#[derive(Parser, Debug)]
#[command(name = "tootfeed-embed", version)]
#[command(about = "Embeddable HTML feeds of Mastodon toots", long_about = None)]
struct Args {
    /// Path to .env file (optional).
    #[arg(long, env = "DOTENV_PATH", default_value = ".env")]
    dotenv: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    let dotenv_loaded = std::path::Path::new(&args.dotenv).exists();
    if dotenv_loaded {
        dotenvy::from_path(&args.dotenv)?;
    }

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    if dotenv_loaded {
        tracing::info!(path = %args.dotenv, "loaded environment file");
    }

    let config = Config::from_env()?;
    let bind_addr = config.bind_addr.clone();
    let state = AppState::new(config)?;

    // Embedding pages fetch /fragment from their own origin.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET]);

    let app = router(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request<_>| {
                tracing::span!(
                    Level::INFO,
                    "http_request",
                    method = %request.method(),
                    path = %request.uri().path(),
                )
            }),
        )
        .layer(cors);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %bind_addr, "starting embed server");
    axum::serve(listener, app).await?;

    Ok(())
}
