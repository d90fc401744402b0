use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{info, warn};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};

use crate::models::{Appointment, BookAppointmentRequest, BookingError};
use crate::services::slots::SlotQueryService;

/// Coordinates a booking request against current availability and writes
/// the appointment row.
///
/// The slot-query pre-check gives bookers a friendly early error, but the
/// serialization point is the storage layer's `UNIQUE (date, time)`
/// constraint: when two bookers race past the pre-check, the second insert
/// comes back as a conflict and is surfaced as an unavailable slot.
pub struct BookingService {
    supabase: Arc<SupabaseClient>,
    slot_service: SlotQueryService,
}

impl BookingService {
    pub fn new(config: &AppConfig) -> Self {
        let supabase = Arc::new(SupabaseClient::new(config));
        let slot_service = SlotQueryService::with_client(Arc::clone(&supabase));

        Self {
            supabase,
            slot_service,
        }
    }

    pub async fn book(
        &self,
        user_id: Uuid,
        request: BookAppointmentRequest,
        auth_token: &str,
    ) -> Result<Appointment, BookingError> {
        info!(
            "Booking appointment for user {} on {} at {}",
            user_id, request.date, request.time
        );

        let open = self
            .slot_service
            .available_times(request.date, Some(auth_token))
            .await?;

        if !open.iter().any(|label| *label == request.time) {
            warn!(
                "Slot {} {} not bookable: absent, unlisted or already taken",
                request.date, request.time
            );
            return Err(BookingError::SlotUnavailable);
        }

        let body = json!({
            "user_id": user_id,
            "date": request.date,
            "time": request.time,
            "reason": request.reason,
            "created_at": Utc::now().to_rfc3339(),
        });

        let inserted: Vec<Appointment> = self
            .supabase
            .request_returning(
                Method::POST,
                "/rest/v1/appointments",
                Some(auth_token),
                Some(body),
            )
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    info!(
                        "Lost the race for slot {} {}, reporting it unavailable",
                        request.date, request.time
                    );
                    BookingError::SlotUnavailable
                }
                other => BookingError::Store(other),
            })?;

        let appointment = inserted.into_iter().next().ok_or_else(|| StoreError::Api {
            status: 500,
            message: "appointment insert returned no representation".to_string(),
        })?;

        info!("Appointment {} booked successfully", appointment.id);
        Ok(appointment)
    }

    /// The caller's appointments from `today` onwards, soonest first.
    pub async fn upcoming_appointments(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&date=gte.{}&order=date.asc,time.asc",
            user_id, today
        );
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(result)
    }

    /// The caller's appointments before `today`, most recent first.
    pub async fn past_appointments(
        &self,
        user_id: Uuid,
        today: NaiveDate,
        auth_token: &str,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!(
            "/rest/v1/appointments?user_id=eq.{}&date=lt.{}&order=date.desc,time.asc",
            user_id, today
        );
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(result)
    }
}
