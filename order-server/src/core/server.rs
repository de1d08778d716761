//! Server Implementation
//!
//! HTTP server startup and graceful shutdown

use std::net::SocketAddr;

use crate::api::build_app;
use crate::core::{Config, Result, ServerState};

/// HTTP Server
pub struct Server {
    config: Config,
    state: ServerState,
}

impl Server {
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self { config, state }
    }

    /// Serve until Ctrl+C, then close every live subscription
    pub async fn run(&self) -> Result<()> {
        let app = build_app(&self.state);
        let addr = SocketAddr::from(([0, 0, 0, 0], self.config.http_port));
        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!(%addr, environment = %self.config.environment, "HTTP server listening");

        let bus = self.state.bus.clone();
        let shutdown = async move {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutdown signal received");
            bus.shutdown();
        };

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}
