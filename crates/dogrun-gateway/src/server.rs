// SPDX-FileCopyrightText: 2026 Dogrun Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Three route groups: unauthenticated infrastructure endpoints (health,
//! maintenance status), the maintenance-gated public API, and the admin
//! API behind bearer auth. Admin routes are never maintenance-gated, so
//! operators can end a window they are inside of.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
};
use dogrun_approval::ApprovalEngine;
use dogrun_core::{DogrunError, RecordStore};
use dogrun_maintenance::MaintenanceGate;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::{AuthConfig, auth_middleware};
use crate::handlers;
use crate::maintenance::maintenance_middleware;

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<ApprovalEngine>,
    pub store: Arc<dyn RecordStore>,
    pub gate: Arc<MaintenanceGate>,
    /// Proxy header carrying the original client address.
    pub client_ip_header: String,
    /// Hours east of UTC for admin wall-clock inputs.
    pub admin_utc_offset_hours: i32,
    pub start_time: std::time::Instant,
}

/// Gateway server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Bearer token for the admin API (None = admin API disabled).
    pub admin_token: Option<String>,
}

impl From<&dogrun_config::GatewayConfig> for ServerConfig {
    fn from(gateway: &dogrun_config::GatewayConfig) -> Self {
        Self {
            host: gateway.host.clone(),
            port: gateway.port,
            admin_token: gateway.admin_token.clone(),
        }
    }
}

/// Build the full router. Split out of [`start_server`] so tests can drive
/// it without binding a socket.
pub fn build_router(config: &ServerConfig, state: ServerState) -> Router {
    let auth = AuthConfig {
        bearer_token: config.admin_token.clone(),
    };

    // Reachable at all times, maintenance included.
    let infra_routes = Router::new()
        .route("/health", get(handlers::get_health))
        .route("/v1/maintenance/status", get(handlers::get_maintenance_status))
        .with_state(state.clone());

    // The public surface the maintenance gate protects.
    let public_routes = Router::new()
        .route("/v1/facilities", get(handlers::get_public_facilities))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            maintenance_middleware,
        ))
        .with_state(state.clone());

    let admin_routes = Router::new()
        .route("/v1/admin/facilities", get(handlers::get_facilities))
        .route(
            "/v1/admin/facilities/{id}/decision",
            post(handlers::post_facility_decision),
        )
        .route(
            "/v1/admin/facilities/{id}",
            delete(handlers::delete_facility),
        )
        .route(
            "/v1/admin/images/{id}/decision",
            post(handlers::post_image_decision),
        )
        .route(
            "/v1/admin/certifications/{id}/decision",
            post(handlers::post_vaccine_decision),
        )
        .route(
            "/v1/admin/certifications/{id}/expiry",
            patch(handlers::patch_vaccine_expiry),
        )
        .route("/v1/admin/maintenance", post(handlers::post_schedule))
        .route(
            "/v1/admin/maintenance/{id}/end",
            post(handlers::post_schedule_end),
        )
        .route("/v1/admin/whitelist", get(handlers::get_whitelist))
        .route("/v1/admin/whitelist", post(handlers::post_whitelist_entry))
        .route_layer(axum_middleware::from_fn_with_state(auth, auth_middleware))
        .with_state(state);

    Router::new()
        .merge(infra_routes)
        .merge(public_routes)
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the gateway HTTP server. Runs until the task is cancelled.
pub async fn start_server(config: &ServerConfig, state: ServerState) -> Result<(), DogrunError> {
    let app = build_router(config, state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
        DogrunError::Internal(format!("failed to bind gateway to {addr}: {e}"))
    })?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .map_err(|e| DogrunError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dogrun_core::ObjectStore;
    use dogrun_storage::{FsObjectStore, SqliteStore};
    use tempfile::tempdir;

    #[tokio::test]
    async fn router_builds_with_and_without_admin_token() {
        // Route registration panics on malformed paths; building both
        // variants is the smoke test.
        let dir = tempdir().unwrap();
        let store: Arc<dyn RecordStore> = Arc::new(
            SqliteStore::open_path(dir.path().join("router.db"))
                .await
                .unwrap(),
        );
        let objects: Arc<dyn ObjectStore> =
            Arc::new(FsObjectStore::new(dir.path().join("objects")));

        for admin_token in [None, Some("token".to_string())] {
            let config = ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 0,
                admin_token,
            };
            let state = ServerState {
                engine: Arc::new(ApprovalEngine::new(
                    Arc::clone(&store),
                    Arc::clone(&objects),
                )),
                store: Arc::clone(&store),
                gate: Arc::new(MaintenanceGate::new(Arc::clone(&store))),
                client_ip_header: "x-forwarded-for".to_string(),
                admin_utc_offset_hours: 9,
                start_time: std::time::Instant::now(),
            };
            let _router = build_router(&config, state);
        }
    }

    #[test]
    fn server_config_comes_from_the_gateway_section() {
        let gateway = dogrun_config::GatewayConfig {
            host: "0.0.0.0".to_string(),
            port: 9000,
            admin_token: Some("secret".to_string()),
        };
        let config = ServerConfig::from(&gateway);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 9000);
        assert_eq!(config.admin_token.as_deref(), Some("secret"));
    }
}
