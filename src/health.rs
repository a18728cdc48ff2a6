//! Health check endpoint
//!
//! Hosting providers ping `/` to decide whether the process is alive. The
//! server shares nothing with the bot.

use axum::{routing::get, Router};
use tokio::net::TcpListener;

pub const ONLINE_BODY: &str = "Bot is online";

async fn online_handler() -> &'static str {
    ONLINE_BODY
}

/// Create the health check router
pub fn create_health_router() -> Router {
    Router::new().route("/", get(online_handler))
}

/// Serve the health router on an already bound listener.
pub async fn serve_health(listener: TcpListener) -> std::io::Result<()> {
    axum::serve(listener, create_health_router()).await
}

/// Bind `0.0.0.0:{port}` and serve until the process exits.
pub async fn start_health_server(port: u16) -> std::io::Result<()> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = TcpListener::bind(&addr).await?;
    log::info!("🌐 Health check server running on port {}", port);
    serve_health(listener).await
}
