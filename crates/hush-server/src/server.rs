use std::sync::Arc;

use tokio::net::TcpListener;

use hush_relay::StateGuard;

use crate::config::StatusConfig;
use crate::error::{ServerError, ServerResult};
use crate::router::build_router;

/// Serves read-only relay status over HTTP.
pub struct StatusServer {
    config: StatusConfig,
    state: Arc<StateGuard>,
}

impl StatusServer {
    pub fn new(config: StatusConfig, state: Arc<StateGuard>) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &StatusConfig {
        &self.config
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(Arc::clone(&self.state))
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!("status server listening on {}", self.config.bind_addr);
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
