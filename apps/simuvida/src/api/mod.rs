//! # SimuVida HTTP API Module
//!
//! This module implements the HTTP JSON API server using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /catalog` - Device types and generic decisions
//! - `GET /devices` - List devices
//! - `GET /devices/{id}` - Fetch a device
//! - `POST /devices/auto/{type}` - Generate a device from the catalog
//! - `PUT /devices/{id}` - Edit name, type and description
//! - `DELETE /devices/{id}` - Delete a device
//! - `POST /devices/{id}/stages` - Append a custom stage
//! - `GET /devices/{id}/stages/{stage_id}` - Fetch a stage
//!
//! ## Security Configuration (Environment Variables)
//!
//! - `SIMUVIDA_CORS_ORIGINS`: Comma-separated list of allowed origins, or "*" for all (default: localhost only)
//! - `SIMUVIDA_RATE_LIMIT`: Requests per second (default: 100, 0 to disable)
//! - `SIMUVIDA_API_KEY`: If set, requires Bearer token authentication

mod auth;
mod handlers;
mod middleware;
mod types;

pub use auth::{API_KEY_ENV, get_api_key_from_env};
pub use middleware::{RATE_LIMIT_ENV, create_rate_limiter, get_rate_limit_from_env};
pub use types::{
    CatalogEntryJson, CatalogResponse, CreateStageRequest, DeviceListResponse, DeviceResponse,
    HealthResponse, StageResponse, UpdateDeviceRequest,
};

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware as axum_middleware,
    routing::{get, post},
};
use simuvida_core::{DeviceCatalog, DeviceService, SimuvidaError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Maximum accepted request body (64 KB).
const MAX_BODY_SIZE: usize = 64 * 1024;

/// Environment variable holding the allowed CORS origins.
pub const CORS_ORIGINS_ENV: &str = "SIMUVIDA_CORS_ORIGINS";

// =============================================================================
// SERVER STATE
// =============================================================================

/// Shared server state.
///
/// The service sits behind one async mutex: the server is the document's
/// single writer, and a request's load/save pair runs without interleaving.
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<Mutex<DeviceService>>,
    /// Immutable reference data; read without taking the service lock.
    pub catalog: Arc<DeviceCatalog>,
}

impl AppState {
    /// Create new app state around a device service.
    #[must_use]
    pub fn new(service: DeviceService) -> Self {
        let catalog = service.shared_catalog();
        Self {
            service: Arc::new(Mutex::new(service)),
            catalog,
        }
    }
}

// =============================================================================
// CORS CONFIGURATION
// =============================================================================

const ALLOWED_METHODS: [Method; 5] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::DELETE,
    Method::OPTIONS,
];

/// Build CORS layer from `SIMUVIDA_CORS_ORIGINS`.
///
/// - `*` allows every origin
/// - unset, or a list with no valid entries, allows localhost only
/// - otherwise a comma-separated origin list
fn build_cors_layer() -> CorsLayer {
    let origins_env = std::env::var(CORS_ORIGINS_ENV).ok();

    match origins_env.as_deref() {
        Some("*") => {
            tracing::warn!(
                "CORS: Allowing ALL origins ({}=*). This is insecure for production!",
                CORS_ORIGINS_ENV
            );
            CorsLayer::permissive()
        }
        Some(origins) => {
            let allowed_origins: Vec<HeaderValue> = origins
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .filter_map(|s| match s.parse::<HeaderValue>() {
                    Ok(hv) => {
                        tracing::info!("CORS: Allowing origin: {}", s);
                        Some(hv)
                    }
                    Err(e) => {
                        tracing::warn!("CORS: Invalid origin '{}': {}", s, e);
                        None
                    }
                })
                .collect();

            if allowed_origins.is_empty() {
                tracing::warn!(
                    "CORS: No valid origins in {}, defaulting to localhost only",
                    CORS_ORIGINS_ENV
                );
                build_localhost_cors()
            } else {
                restricted_cors(allowed_origins)
            }
        }
        None => {
            tracing::info!(
                "CORS: No {} set, defaulting to localhost only",
                CORS_ORIGINS_ENV
            );
            build_localhost_cors()
        }
    }
}

fn restricted_cors(origins: Vec<HeaderValue>) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(ALLOWED_METHODS)
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
}

/// Localhost origins on the default server port and common dev ports.
fn build_localhost_cors() -> CorsLayer {
    let origins: Vec<HeaderValue> = [
        "http://localhost:3000",
        "http://localhost:5000",
        "http://127.0.0.1:3000",
        "http://127.0.0.1:5000",
    ]
    .into_iter()
    .filter_map(|o| o.parse::<HeaderValue>().ok())
    .collect();

    restricted_cors(origins)
}

// =============================================================================
// ROUTER CREATION
// =============================================================================

/// Create the axum router with all endpoints and middleware.
///
/// Middleware stack (outer to inner):
/// 1. Tracing - logs all requests
/// 2. CORS - handles preflight requests
/// 3. Body limit
/// 4. Rate Limiting (if enabled)
/// 5. Authentication (if configured)
pub fn create_router(state: AppState) -> Router {
    let rate_limit = get_rate_limit_from_env();
    let rate_limiter = create_rate_limiter(rate_limit);
    if rate_limiter.is_some() {
        tracing::info!("Rate limiting enabled: {} requests/second", rate_limit);
    } else {
        tracing::info!("Rate limiting disabled");
    }

    let has_auth = get_api_key_from_env().is_some();
    if has_auth {
        tracing::info!("API key authentication enabled");
    } else {
        tracing::warn!(
            "API key authentication DISABLED - all endpoints are publicly accessible. \
             Set {} to enable authentication.",
            API_KEY_ENV
        );
    }

    let mut router = Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/catalog", get(handlers::catalog_handler))
        .route("/devices", get(handlers::list_devices_handler))
        .route(
            "/devices/auto/{device_type}",
            post(handlers::create_device_handler),
        )
        .route(
            "/devices/{id}",
            get(handlers::get_device_handler)
                .put(handlers::update_device_handler)
                .delete(handlers::delete_device_handler),
        )
        .route("/devices/{id}/stages", post(handlers::create_stage_handler))
        .route(
            "/devices/{id}/stages/{stage_id}",
            get(handlers::get_stage_handler),
        );

    if has_auth {
        router = router.layer(axum_middleware::from_fn(auth::api_key_auth_middleware));
    }

    if let Some(limiter) = rate_limiter {
        router = router.layer(axum_middleware::from_fn_with_state(
            limiter,
            middleware::rate_limit_middleware,
        ));
    }

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(build_cors_layer())
                .layer(axum::extract::DefaultBodyLimit::max(MAX_BODY_SIZE)),
        )
        .with_state(state)
}

// =============================================================================
// SERVER STARTUP
// =============================================================================

/// Resolve on Ctrl+C so in-flight requests can finish.
async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Start the HTTP server.
pub async fn run_server(addr: &str, service: DeviceService) -> Result<(), SimuvidaError> {
    let state = AppState::new(service);
    let router = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| SimuvidaError::IoError(format!("Bind failed: {}", e)))?;

    tracing::info!("SimuVida HTTP server listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| SimuvidaError::IoError(format!("Server error: {}", e)))
}
