use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use shared_config::AppConfig;

use crate::handlers;

// The whole careers surface is public: listings feed the marketing site
// and applicants have no account yet.
pub fn careers_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/jobs", get(handlers::list_jobs))
        .route("/apply", post(handlers::apply))
        .with_state(state)
}
