use std::sync::Arc;

use axum::{
    extract::{Extension, Path, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::require_staff;

use crate::models::{ContactError, SubmitContactRequest};
use crate::service::ContactService;

#[axum::debug_handler]
pub async fn submit_message(
    State(state): State<Arc<AppConfig>>,
    Json(request): Json<SubmitContactRequest>,
) -> Result<Json<Value>, AppError> {
    let contact_service = ContactService::new(&state);

    let message = contact_service
        .submit(request)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "success": true,
        "id": message.id,
        "message": "Thanks for reaching out, we will get back to you shortly"
    })))
}

#[axum::debug_handler]
pub async fn list_messages(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let contact_service = ContactService::new(&state);
    let messages = contact_service
        .list_messages(auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "messages": messages,
        "total": messages.len()
    })))
}

#[axum::debug_handler]
pub async fn solve_message(
    State(state): State<Arc<AppConfig>>,
    Path(message_id): Path<Uuid>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let contact_service = ContactService::new(&state);
    contact_service
        .solve_message(message_id, auth.token())
        .await
        .map_err(|e| match e {
            ContactError::NotFound => AppError::NotFound("Contact message not found".to_string()),
            other => AppError::Database(other.to_string()),
        })?;

    Ok(Json(json!({ "success": true })))
}
