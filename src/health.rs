//! Liveness endpoint.
//!
//! Hosting platforms ping `GET /` to keep the process awake and to decide
//! whether it is alive. The handler shares no state with the ledger.

use std::future::Future;

use axum::{Router, routing::get};
use tokio::net::TcpListener;
use tracing::info;

use crate::error::Result;

pub const BODY: &str = "Bot is running";

/// Router with the single liveness route.
pub fn router() -> Router {
    Router::new().route("/", get(alive))
}

async fn alive() -> &'static str {
    BODY
}

/// Serve the liveness route on `listener` until `shutdown` resolves.
pub async fn serve<S>(listener: TcpListener, shutdown: S) -> Result<()>
where
    S: Future<Output = ()> + Send + 'static,
{
    if let Ok(addr) = listener.local_addr() {
        info!(%addr, "liveness endpoint listening");
    }
    axum::serve(listener, router())
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}
