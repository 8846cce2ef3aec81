pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::forest::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Forest layout API
        .route("/api/v1/forest/config", get(handlers::handle_get_config))
        .route("/api/v1/forest/layout", post(handlers::handle_generate_layout))
        .route("/api/v1/forest/layout/stats", post(handlers::handle_layout_stats))
        .with_state(state)
}
