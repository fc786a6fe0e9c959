//! Read-only HTTP status endpoint for the Hush confession relay.
//!
//! Operators can see whether confessions are open, where they go and how
//! many were published. Identity keys and user ids are never exposed.

pub mod config;
pub mod error;
pub mod handler;
pub mod router;
pub mod server;

pub use config::StatusConfig;
pub use error::{ServerError, ServerResult};
pub use router::build_router;
pub use server::StatusServer;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;

    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use tower::util::ServiceExt;

    use hush_relay::{BotState, RelayConfig, StateGuard, StateSnapshot};
    use hush_types::SurfaceId;

    fn guard() -> Arc<StateGuard> {
        let config = RelayConfig {
            target_surface: Some(SurfaceId::new("chan-1")),
            max_allowed: 4,
            ..RelayConfig::default()
        };
        Arc::new(StateGuard::new(BotState::from_config(&config).unwrap()))
    }

    async fn get(router: axum::Router, uri: &str) -> (u16, Vec<u8>) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status().as_u16();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, body.to_vec())
    }

    #[tokio::test]
    async fn health_endpoint() {
        let (status, body) = get(build_router(guard()), "/v1/health").await;
        assert_eq!(status, 200);
        assert_eq!(body, br#"{"status":"ok"}"#);
    }

    #[tokio::test]
    async fn info_endpoint() {
        let (status, _) = get(build_router(guard()), "/v1/info").await;
        assert_eq!(status, 200);
    }

    #[tokio::test]
    async fn status_reflects_live_state() {
        let state = guard();
        state.lock().await.set_active(false);
        let (status, body) = get(build_router(Arc::clone(&state)), "/v1/status").await;
        assert_eq!(status, 200);
        let snapshot: StateSnapshot = serde_json::from_slice(&body).unwrap();
        assert!(!snapshot.active);
        assert_eq!(snapshot.max_allowed, 4);
        assert_eq!(snapshot.target_surface, Some(SurfaceId::new("chan-1")));
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let (status, _) = get(build_router(guard()), "/v1/keys").await;
        assert_eq!(status, 404);
    }

    #[tokio::test]
    async fn status_served_while_state_is_locked() {
        let state = guard();
        let _held = state.lock().await;
        let request = get(build_router(Arc::clone(&state)), "/v1/status");
        let (status, body) = tokio::time::timeout(Duration::from_secs(1), request)
            .await
            .expect("status endpoint waited for the state lock");
        assert_eq!(status, 200);
        let snapshot: StateSnapshot = serde_json::from_slice(&body).unwrap();
        assert!(snapshot.active);
    }

    #[test]
    fn server_construction() {
        let server = StatusServer::new(StatusConfig::default(), guard());
        assert_eq!(server.config().bind_addr.port(), 8787);
        let _router = server.router();
    }
}
