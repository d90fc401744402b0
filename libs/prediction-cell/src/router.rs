use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

// Estimates are tied to an account, so the whole surface sits behind auth.
pub fn prediction_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", post(handlers::predict_charges))
        .route("/history", get(handlers::prediction_history))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}
