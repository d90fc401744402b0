use std::sync::Arc;

use axum::{extract::State, Json};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::error::AppError;

use crate::models::{ApplyRequest, CareersError};
use crate::service::CareersService;

#[axum::debug_handler]
pub async fn list_jobs(State(state): State<Arc<AppConfig>>) -> Result<Json<Value>, AppError> {
    let careers_service = CareersService::new(&state);

    let jobs = careers_service
        .list_jobs()
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "jobs": jobs,
        "total": jobs.len()
    })))
}

#[axum::debug_handler]
pub async fn apply(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<ApplyRequest>,
) -> Result<Json<Value>, AppError> {
    let careers_service = CareersService::new(&state);

    let application = careers_service.apply(request).await.map_err(|e| match e {
        CareersError::JobNotFound => AppError::NotFound("Job not found".to_string()),
        other => AppError::Database(other.to_string()),
    })?;

    Ok(Json(json!({
        "success": true,
        "application": application,
        "message": "Application submitted successfully"
    })))
}
