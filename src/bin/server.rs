//! The REST API server for the expense store.

use std::net::SocketAddr;

use anyhow::Context;
use axum::{
    Router,
    extract::{MatchedPath, Request},
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use spendlog::{AppState, build_router, graceful_shutdown};

/// The expense store REST API server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the application SQLite database.
    #[arg(long, env = "SPENDLOG_DB")]
    db_path: String,

    /// The port to serve the API from.
    #[arg(short, long, env = "PORT", default_value_t = 5000)]
    port: u16,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup_logging();

    let args = Args::parse();

    let connection = Connection::open(&args.db_path)
        .with_context(|| format!("could not open database at {}", args.db_path))?;
    let state = AppState::new(connection).context("could not initialize the database")?;

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let router = add_tracing_layer(build_router(state));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("HTTP server listening on {addr}");
    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await
        .context("server exited with an error")?;

    Ok(())
}

fn setup_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().pretty())
        .init();
}

fn add_tracing_layer(router: Router) -> Router {
    let tracing_layer = TraceLayer::new_for_http()
        .make_span_with(|req: &Request| {
            let method = req.method();
            let uri = req.uri();

            let matched_path = req
                .extensions()
                .get::<MatchedPath>()
                .map(|matched_path| matched_path.as_str());

            tracing::debug_span!("request", %method, %uri, matched_path)
        })
        // Errors are logged where they occur, so skip the default 5xx log.
        .on_failure(());

    router.layer(tracing_layer)
}
