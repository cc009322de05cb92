pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::extract::handlers as extract;
use crate::matching::handlers as matching;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Crew API
        .route("/api/v1/crews/:action", post(matching::handle_run_crew))
        .route("/api/v1/crews/:action/graph", get(matching::handle_crew_graph))
        // Text extraction
        .route("/api/v1/extract", post(extract::handle_extract))
        .with_state(state)
}
