use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn contact_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new().route("/", post(handlers::submit_message));

    // Inbox management is staff-only (enforced in handlers)
    let protected_routes = Router::new()
        .route("/messages", get(handlers::list_messages))
        .route("/messages/{message_id}/solve", post(handlers::solve_message))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
