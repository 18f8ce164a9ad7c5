//! HTTP surface of the cinema authentication boundary
//!
//! Wires the token service into an axum router: public token endpoints,
//! bearer-protected user endpoints, permissive CORS and request tracing.
//! Every error leaves as `{"error_code", "message"}` JSON.

pub mod handlers;
pub mod middleware;
pub mod models;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use cinema_auth::TokenService;
use std::{net::SocketAddr, sync::Arc};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

/// Application state shared across handlers
pub struct AppState {
    pub tokens: Arc<TokenService>,
}

impl AppState {
    pub fn new(tokens: TokenService) -> Self {
        Self {
            tokens: Arc::new(tokens),
        }
    }
}

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Cinema Backend",
        version = "1.0.0",
        description = "Session token API of the cinema backend"
    ),
    paths(
        handlers::health_check,
        handlers::verify_token,
        handlers::refresh_token,
        handlers::get_current_user,
    ),
    components(
        schemas(
            models::HealthResponse,
            models::TokenRequest,
            models::TokenResponse,
            models::ClaimsResponse,
            cinema_errors::ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "common", description = "System health endpoints"),
        (name = "auth", description = "Session token endpoints"),
        (name = "users", description = "Authenticated user endpoints")
    )
)]
pub struct ApiDoc;

/// API server configuration
pub struct ApiServerConfig {
    /// Address to bind the API server
    pub bind_addr: SocketAddr,
    /// Enable CORS
    pub enable_cors: bool,
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            enable_cors: true,
        }
    }
}

/// API Server
pub struct ApiServer {
    config: ApiServerConfig,
    state: Arc<AppState>,
}

impl ApiServer {
    pub fn new(config: ApiServerConfig, tokens: TokenService) -> Self {
        Self {
            config,
            state: Arc::new(AppState::new(tokens)),
        }
    }

    /// Build the router with all routes
    pub fn build_router(&self) -> Router {
        let public_router = Router::new()
            .route("/api/v1/common/health", get(handlers::health_check))
            .route("/api/v1/auth/verify", post(handlers::verify_token))
            .route("/api/v1/auth/refresh", post(handlers::refresh_token))
            .route("/api/openapi.json", get(handlers::openapi));

        // route_layer keeps unmatched paths out of the auth check so they 404
        let protected_router = Router::new()
            .route("/api/v1/users/me", get(handlers::get_current_user))
            .route_layer(axum_middleware::from_fn_with_state(
                self.state.clone(),
                middleware::require_auth,
            ));

        let mut router = public_router
            .merge(protected_router)
            .fallback(handlers::not_found)
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http());

        if self.config.enable_cors {
            // Mirrors the request origin, so credentials stay allowed
            router = router.layer(CorsLayer::very_permissive());
        }

        router
    }

    /// Start the API server
    pub async fn start(self) -> Result<(), anyhow::Error> {
        let router = self.build_router();

        info!("Starting API server on {}", self.config.bind_addr);
        info!(
            "OpenAPI spec: http://{}/api/openapi.json",
            self.config.bind_addr
        );

        let listener = tokio::net::TcpListener::bind(self.config.bind_addr).await?;

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        info!("API server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
