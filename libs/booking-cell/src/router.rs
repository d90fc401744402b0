use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};

use shared_config::AppConfig;
use shared_utils::extractor::auth_middleware;

use crate::handlers;

pub fn booking_routes(state: Arc<AppConfig>) -> Router {
    // Slot lookup feeds the public booking form; everything else needs a
    // session.
    let public_routes = Router::new()
        .route("/available-times", get(handlers::available_times));

    let protected_routes = Router::new()
        .route("/appointments", post(handlers::book_appointment))
        .route("/appointments/upcoming", get(handlers::upcoming_appointments))
        .route("/appointments/past", get(handlers::past_appointments))
        // Staff-only availability administration (enforced in handlers)
        .route("/availability", put(handlers::upsert_availability))
        .route("/availability", get(handlers::list_availability))
        .route("/availability/{date}", delete(handlers::delete_availability))
        .layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(state)
}
