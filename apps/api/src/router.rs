use std::sync::Arc;

use axum::{routing::get, Router};

use booking_cell::router::booking_routes;
use careers_cell::router::careers_routes;
use contact_cell::router::contact_routes;
use prediction_cell::router::prediction_routes;
use shared_config::AppConfig;

/// Composition root: every cell is constructed and wired into the routing
/// table here, in one place.
pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Harbor Insurance API is running!" }))
        .nest("/booking", booking_routes(state.clone()))
        .nest("/contact", contact_routes(state.clone()))
        .nest("/careers", careers_routes(state.clone()))
        .nest("/predictions", prediction_routes(state))
}
