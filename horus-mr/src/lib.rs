//! horus-mr library - Match Records service
//!
//! Accepts scouting match records over HTTP, stamps them with identity and
//! receipt metadata, and keeps each one as a JSON file under the storage root.

use std::sync::Arc;

use axum::Router;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod assigner;
pub mod error;
pub mod models;
pub mod store;
pub mod validator;

pub use crate::assigner::Assigner;
pub use crate::error::{ApiError, ApiResult};
pub use crate::store::{FileRecordStore, RecordStore};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Record persistence backend
    pub store: Arc<dyn RecordStore>,
    /// Stamps id and receipt metadata on accepted submissions
    pub assigner: Assigner,
}

impl AppState {
    /// Create application state with the system clock
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self::with_assigner(store, Assigner::default())
    }

    pub fn with_assigner(store: Arc<dyn RecordStore>, assigner: Assigner) -> Self {
        Self { store, assigner }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route(
            "/",
            get(api::service_descriptor).fallback(api::method_not_allowed),
        )
        .route(
            "/api/health",
            get(api::health_check).fallback(api::method_not_allowed),
        )
        .merge(api::record_routes())
        .fallback(api::route_not_found)
        .with_state(state)
        .layer(CatchPanicLayer::custom(api::handle_panic))
        .layer(TraceLayer::new_for_http())
        // Browser scouting clients post from other origins
        .layer(CorsLayer::permissive())
}
