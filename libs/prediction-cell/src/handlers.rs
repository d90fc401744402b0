use std::sync::Arc;

use axum::{
    extract::{Extension, State},
    Json,
};
use axum_extra::TypedHeader;
use headers::{authorization::Bearer, Authorization};
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;

use crate::models::{PredictionError, PredictionInput};
use crate::services::charges::ChargePredictionService;

fn session_user_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Token subject is not a valid account id".to_string()))
}

#[axum::debug_handler]
pub async fn predict_charges(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(input): Json<PredictionInput>,
) -> Result<Json<Value>, AppError> {
    let user_id = session_user_id(&user)?;

    let prediction_service = ChargePredictionService::new(&state);

    let record = prediction_service
        .predict_charges(user_id, input, auth.token())
        .await
        .map_err(|e| match e {
            PredictionError::Validation(msg) => AppError::Validation(msg),
            PredictionError::NotConfigured => {
                AppError::ExternalService("Charge prediction is currently unavailable".to_string())
            }
            PredictionError::ModelApi { message } => AppError::ExternalService(message),
            PredictionError::Transport(e) => AppError::ExternalService(e.to_string()),
            PredictionError::Store(e) => AppError::Database(e.to_string()),
        })?;

    Ok(Json(json!({
        "prediction": record.predicted_charges,
        "record": record
    })))
}

#[axum::debug_handler]
pub async fn prediction_history(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let user_id = session_user_id(&user)?;

    let prediction_service = ChargePredictionService::new(&state);
    let predictions = prediction_service
        .history(user_id, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "predictions": predictions,
        "total": predictions.len()
    })))
}
