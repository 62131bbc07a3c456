use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
};

use shared_config::AppConfig;

use crate::handlers;

pub fn availability_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/days", get(handlers::list_days))
        .route("/validate", post(handlers::validate_availability_form))
        .route("/validate/json", post(handlers::validate_availability_json))
        .with_state(state)
}
