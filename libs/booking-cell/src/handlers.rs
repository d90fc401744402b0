use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query, State},
    Json,
};
use axum_extra::TypedHeader;
use chrono::Utc;
use headers::{authorization::Bearer, Authorization};
use serde::Deserialize;
use serde_json::{json, Value};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_models::auth::User;
use shared_models::error::AppError;
use shared_utils::extractor::require_staff;

use crate::models::{BookAppointmentRequest, BookingError, UpsertAvailabilityRequest};
use crate::services::availability::AvailabilityService;
use crate::services::booking::BookingService;
use crate::services::slots::SlotQueryService;

#[derive(Debug, Deserialize)]
pub struct AvailableTimesQuery {
    pub date: Option<String>,
}

fn session_user_id(user: &User) -> Result<Uuid, AppError> {
    Uuid::parse_str(&user.id)
        .map_err(|_| AppError::Auth("Token subject is not a valid account id".to_string()))
}

// ==============================================================================
// PUBLIC HANDLERS
// ==============================================================================

/// Open slots for a date, as consumed by the booking form. No date (or a
/// blank one) yields an empty list rather than an error.
#[axum::debug_handler]
pub async fn available_times(
    State(state): State<Arc<AppConfig>>,
    Query(query): Query<AvailableTimesQuery>,
) -> Result<Json<Value>, AppError> {
    let raw = match query.date {
        Some(raw) if !raw.trim().is_empty() => raw,
        _ => return Ok(Json(json!({ "times": [] }))),
    };

    let date = SlotQueryService::parse_date(&raw)
        .map_err(|_| AppError::BadRequest(format!("Invalid date format: {}", raw)))?;

    let slot_service = SlotQueryService::new(&state);
    let times = slot_service
        .available_times(date, None)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "times": times })))
}

// ==============================================================================
// AUTHENTICATED BOOKING HANDLERS
// ==============================================================================

#[axum::debug_handler]
pub async fn book_appointment(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<BookAppointmentRequest>,
) -> Result<Json<Value>, AppError> {
    let token = auth.token();
    let user_id = session_user_id(&user)?;

    let booking_service = BookingService::new(&state);

    let appointment = booking_service
        .book(user_id, request, token)
        .await
        .map_err(|e| match e {
            BookingError::SlotUnavailable => {
                AppError::Conflict("That appointment slot is no longer available".to_string())
            }
            BookingError::InvalidDate(raw) => {
                AppError::BadRequest(format!("Invalid date format: {}", raw))
            }
            other => AppError::Database(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "appointment": appointment,
        "message": "Appointment booked successfully"
    })))
}

#[axum::debug_handler]
pub async fn upcoming_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let user_id = session_user_id(&user)?;

    let booking_service = BookingService::new(&state);
    let appointments = booking_service
        .upcoming_appointments(user_id, Utc::now().date_naive(), auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

#[axum::debug_handler]
pub async fn past_appointments(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    let user_id = session_user_id(&user)?;

    let booking_service = BookingService::new(&state);
    let appointments = booking_service
        .past_appointments(user_id, Utc::now().date_naive(), auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({
        "appointments": appointments,
        "total": appointments.len()
    })))
}

// ==============================================================================
// STAFF AVAILABILITY ADMINISTRATION
// ==============================================================================

#[axum::debug_handler]
pub async fn upsert_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
    Json(request): Json<UpsertAvailabilityRequest>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let availability_service = AvailabilityService::new(&state);

    let availability = availability_service
        .upsert_availability(request, auth.token())
        .await
        .map_err(|e| match e {
            BookingError::MissingTimeSlots => {
                AppError::Validation("time_slots field is required".to_string())
            }
            other => AppError::Database(other.to_string()),
        })?;

    Ok(Json(json!({
        "success": true,
        "availability": availability,
        "display": availability.display_times()
    })))
}

#[axum::debug_handler]
pub async fn list_availability(
    State(state): State<Arc<AppConfig>>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let availability_service = AvailabilityService::new(&state);
    let entries = availability_service
        .list_availability(auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    let listed: Vec<Value> = entries
        .iter()
        .map(|a| {
            json!({
                "availability": a,
                "display": a.display_times()
            })
        })
        .collect();

    Ok(Json(json!({
        "entries": listed,
        "total": listed.len()
    })))
}

#[axum::debug_handler]
pub async fn delete_availability(
    State(state): State<Arc<AppConfig>>,
    Path(date): Path<String>,
    TypedHeader(auth): TypedHeader<Authorization<Bearer>>,
    Extension(user): Extension<User>,
) -> Result<Json<Value>, AppError> {
    require_staff(&user)?;

    let date = SlotQueryService::parse_date(&date)
        .map_err(|_| AppError::BadRequest(format!("Invalid date format: {}", date)))?;

    let availability_service = AvailabilityService::new(&state);
    availability_service
        .delete_availability(date, auth.token())
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;

    Ok(Json(json!({ "success": true })))
}
