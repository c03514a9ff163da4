use anyhow::{Context, Result, bail};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use clap::Parser;
use std::net::SocketAddr;
use std::path::PathBuf;
use switchboard_server::{RelayConfig, SignalingService, ws_handler};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "switchboard", version, about = "Signaling relay for browser peers")]
struct Args {
    /// Address the HTTP server listens on.
    #[arg(long, env = "SWITCHBOARD_BIND", default_value = "0.0.0.0:3000")]
    bind: SocketAddr,

    /// Route that accepts WebSocket upgrades.
    #[arg(long, env = "SWITCHBOARD_WS_PATH", default_value = "/ws")]
    ws_path: String,

    /// Directory served for every other path (the browser client).
    #[arg(long, env = "SWITCHBOARD_STATIC_DIR")]
    static_dir: Option<PathBuf>,

    #[arg(long, env = "SWITCHBOARD_MAX_QUEUED_BYTES", default_value_t = RelayConfig::default().max_queued_bytes)]
    max_queued_bytes: usize,

    #[arg(long, env = "SWITCHBOARD_MAX_MESSAGE_BYTES", default_value_t = RelayConfig::default().max_message_bytes)]
    max_message_bytes: usize,

    /// Used when RUST_LOG is not set.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn relay_config(&self) -> RelayConfig {
        RelayConfig {
            max_queued_bytes: self.max_queued_bytes,
            max_message_bytes: self.max_message_bytes,
            ..RelayConfig::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    if !args.ws_path.starts_with('/') {
        bail!("--ws-path must start with '/', got {:?}", args.ws_path);
    }

    info!("Initializing signaling relay...");
    let signaling = SignalingService::new(args.relay_config());

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let mut app = Router::new()
        .route(&args.ws_path, get(ws_handler))
        .route("/stats", get(stats_handler));

    if let Some(dir) = &args.static_dir {
        info!("Serving static files from {}", dir.display());
        app = app.fallback_service(ServeDir::new(dir));
    }

    let app = app.layer(cors).with_state(signaling);

    let listener = tokio::net::TcpListener::bind(args.bind)
        .await
        .with_context(|| format!("Failed to bind {}", args.bind))?;
    info!(
        "Signaling server listening on http://{} (WebSocket at {})",
        args.bind, args.ws_path
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server failed")?;

    info!("Signaling server stopped");
    Ok(())
}

async fn stats_handler(State(signaling): State<SignalingService>) -> impl IntoResponse {
    match signaling.stats().await {
        Ok(stats) => Json(stats).into_response(),
        Err(e) => {
            error!("Stats request failed: {}", e);
            StatusCode::SERVICE_UNAVAILABLE.into_response()
        }
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for ctrl-c: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
