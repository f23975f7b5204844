use crate::state::AppContext;
use axum::Router;
use axum::routing::{get, post};
use std::sync::Arc;

pub mod handlers;
pub mod responses;

pub fn router(context: Arc<AppContext>) -> Router {
    Router::new()
        .route("/api/trip", post(handlers::post_trip))
        .route("/api/health", get(handlers::get_health))
        .with_state(context)
}
