//! API Route Configuration

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use super::handlers::{self, AppState};

/// Create the dashboard router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/form", get(handlers::get_form))
        .route("/valuation", post(handlers::create_valuation))
        .route("/insights", get(handlers::get_insights))
        .route("/about", get(handlers::get_about));

    Router::new()
        .nest("/api", api)
        .route("/", get(handlers::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
