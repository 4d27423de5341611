pub mod health;
pub mod resume;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/compile-resume", post(resume::handle_compile))
        .route("/api/download/:filename", get(resume::handle_download))
        .with_state(state)
}
