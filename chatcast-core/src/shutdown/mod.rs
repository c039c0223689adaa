//! Graceful shutdown coordinator

use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};
use tracing::{error, info, warn};

/// Shutdown signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    Graceful,
}

/// Shutdown state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownState {
    Running,
    ShuttingDown,
    Shutdown,
}

/// Fans a single shutdown request out to every long-running task
pub struct ShutdownCoordinator {
    state: Arc<RwLock<ShutdownState>>,
    shutdown_tx: broadcast::Sender<ShutdownSignal>,
}

impl ShutdownCoordinator {
    pub fn new() -> Self {
        let (shutdown_tx, _) = broadcast::channel(16);

        Self {
            state: Arc::new(RwLock::new(ShutdownState::Running)),
            shutdown_tx,
        }
    }

    /// Subscribe to shutdown notifications
    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownSignal> {
        self.shutdown_tx.subscribe()
    }

    /// Ask every subscriber to wind down
    pub async fn shutdown(&self) {
        let mut state = self.state.write().await;
        if *state != ShutdownState::Running {
            warn!("Shutdown already in progress");
            return;
        }

        info!("Initiating graceful shutdown");
        *state = ShutdownState::ShuttingDown;
        drop(state);

        if self.shutdown_tx.send(ShutdownSignal::Graceful).is_err() {
            // Nobody listening yet; waiters check the state first
            warn!("Shutdown requested with no active listeners");
        }
    }

    /// Record that all components have stopped
    pub async fn mark_complete(&self) {
        *self.state.write().await = ShutdownState::Shutdown;
        info!("Shutdown complete");
    }

    /// Check if shutdown is in progress
    pub async fn is_shutting_down(&self) -> bool {
        *self.state.read().await != ShutdownState::Running
    }

    /// Get current state
    pub async fn state(&self) -> ShutdownState {
        *self.state.read().await
    }

    /// Resolve once shutdown has been requested
    ///
    /// Returns immediately when the request happened before the call.
    pub async fn wait_for_shutdown(&self) {
        let mut rx = self.subscribe();
        if self.is_shutting_down().await {
            return;
        }
        let _ = rx.recv().await;
    }
}

impl Default for ShutdownCoordinator {
    fn default() -> Self {
        Self::new()
    }
}

/// Install signal handlers for graceful shutdown
#[cfg(unix)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let (mut sigterm, mut sigint) =
            match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(term), Ok(int)) => (term, int),
                (Err(e), _) | (_, Err(e)) => {
                    error!("Failed to install signal handlers: {}", e);
                    return;
                }
            };

        tokio::select! {
            _ = sigterm.recv() => info!("Received SIGTERM"),
            _ = sigint.recv() => info!("Received SIGINT"),
        }
        coordinator.shutdown().await;
    });
}

/// Install signal handlers for graceful shutdown (Windows)
#[cfg(windows)]
pub fn install_signal_handlers(coordinator: Arc<ShutdownCoordinator>) {
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            return;
        }
        info!("Received Ctrl+C");
        coordinator.shutdown().await;
    });
}
