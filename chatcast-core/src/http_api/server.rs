//! HTTP server for the chat API

use super::api::build_router;
use super::state::AppState;
use crate::shutdown::ShutdownCoordinator;
use anyhow::Result;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, warn};

/// HTTP server exposing the REST API and the event stream
pub struct ChatServer {
    state: Arc<AppState>,
    addr: SocketAddr,
    shutdown: Arc<ShutdownCoordinator>,
    shutdown_timeout: Duration,
}

impl ChatServer {
    pub fn new(
        state: AppState,
        addr: SocketAddr,
        shutdown: Arc<ShutdownCoordinator>,
        shutdown_timeout: Duration,
    ) -> Self {
        Self {
            state: Arc::new(state),
            addr,
            shutdown,
            shutdown_timeout,
        }
    }

    /// Bind and serve until shutdown is requested
    pub async fn run(self) -> Result<()> {
        let listener = TcpListener::bind(self.addr).await?;
        self.serve(listener).await
    }

    /// Serve on an already bound listener
    ///
    /// Event streams never end on their own, so once shutdown is requested
    /// open connections get `shutdown_timeout` to drain before being dropped.
    pub async fn serve(self, listener: TcpListener) -> Result<()> {
        info!("HTTP API listening on {}", listener.local_addr()?);

        let router = build_router(self.state);

        let graceful = {
            let shutdown = self.shutdown.clone();
            axum::serve(listener, router)
                .with_graceful_shutdown(async move { shutdown.wait_for_shutdown().await })
                .into_future()
        };

        let deadline = {
            let shutdown = self.shutdown.clone();
            let timeout = self.shutdown_timeout;
            async move {
                shutdown.wait_for_shutdown().await;
                tokio::time::sleep(timeout).await;
            }
        };

        tokio::select! {
            result = graceful => result?,
            _ = deadline => warn!("Shutdown timeout elapsed, dropping open connections"),
        }

        self.shutdown.mark_complete().await;
        Ok(())
    }
}
