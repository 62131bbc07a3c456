use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    Form, Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{DayOfWeek, WeeklyAvailability};
use crate::services::AvailabilityService;

#[axum::debug_handler]
pub async fn list_days() -> Json<Value> {
    Json(json!({
        "days": DayOfWeek::ALL
    }))
}

/// Checks a submitted availability settings form. Overlapping days are a
/// normal outcome reported in the body, not an error status.
#[axum::debug_handler]
pub async fn validate_availability_form(
    State(config): State<Arc<AppConfig>>,
    Form(fields): Form<Vec<(String, String)>>,
) -> Result<Json<Value>, AppError> {
    let service = AvailabilityService::new(&config);

    let report = service.validate_form(fields)?;

    Ok(Json(json!(report)))
}

/// JSON variant of the form check. Bodies the extractor cannot read (bad
/// syntax, unknown day names, wrong content type) answer 400 with the same
/// `{"error"}` body as the form route.
#[axum::debug_handler]
pub async fn validate_availability_json(
    State(config): State<Arc<AppConfig>>,
    payload: Result<Json<WeeklyAvailability>, JsonRejection>,
) -> Result<Json<Value>, AppError> {
    let Json(availability) = payload.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let service = AvailabilityService::new(&config);

    let report = service.validate(&availability)?;

    Ok(Json(json!(report)))
}
