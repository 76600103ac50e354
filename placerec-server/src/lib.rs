//! placerec-server library
//!
//! HTTP service that aggregates place recommendations. Exposes the router and
//! store backends for the binary and for integration tests.

use axum::Router;
use std::path::PathBuf;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod config;
pub mod cors;
pub mod error;
pub mod store;

pub use crate::cors::AllowedOrigin;
pub use crate::error::{ApiError, ApiResult};
pub use crate::store::{RecommendationStore, SharedStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recommendation store, owned by the server process
    pub store: SharedStore,
}

impl AppState {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

/// Router-level settings
#[derive(Debug, Clone, Default)]
pub struct RouterConfig {
    pub allowed_origin: AllowedOrigin,
    /// Serve frontend files from this directory for unmatched paths
    pub static_dir: Option<PathBuf>,
}

/// Build application router
pub fn build_router(state: AppState, config: &RouterConfig) -> Router {
    let mut router = Router::new()
        .merge(api::recommendation_routes())
        .merge(api::health_routes())
        .with_state(state);

    if let Some(dir) = &config.static_dir {
        router = router.fallback_service(ServeDir::new(dir));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors::cors_layer(&config.allowed_origin))
}
