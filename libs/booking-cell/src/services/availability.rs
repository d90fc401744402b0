use chrono::{NaiveDate, Utc};
use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};

use crate::models::{Availability, BookingError, UpsertAvailabilityRequest};

/// Normalize a submitted `time_slots` field.
///
/// The three-state input mirrors a JSON body in which the key may be
/// absent, explicitly null, or a list of labels:
/// - absent -> [`BookingError::MissingTimeSlots`]
/// - present but null -> `Ok(None)`, null in, null out
/// - present with a list -> the list unchanged: no format checking of the
///   labels, no de-duplication, no sorting
///
/// An explicit empty list is valid and means "no slots offered that day";
/// it is not conflated with the missing key.
pub fn validate_time_slots(
    field: Option<Option<Vec<String>>>,
) -> Result<Option<Vec<String>>, BookingError> {
    match field {
        None => Err(BookingError::MissingTimeSlots),
        Some(value) => Ok(value),
    }
}

/// Staff-side administration of the availability supply.
pub struct AvailabilityService {
    supabase: SupabaseClient,
}

impl AvailabilityService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Define (or redefine) the slot list for a date.
    ///
    /// A validated null leaves an existing row's list untouched; for a new
    /// date it persists an empty list, since stored `time_slots` is never
    /// null.
    pub async fn upsert_availability(
        &self,
        request: UpsertAvailabilityRequest,
        auth_token: &str,
    ) -> Result<Availability, BookingError> {
        let validated = validate_time_slots(request.time_slots)?;
        debug!("Upserting availability for {}", request.date);

        let existing = self.find_by_date(request.date, Some(auth_token)).await?;

        let availability = match existing {
            Some(current) => {
                let slots = validated.unwrap_or(current.time_slots);
                let body = json!({
                    "time_slots": slots,
                    "updated_at": Utc::now().to_rfc3339(),
                });

                let path = format!("/rest/v1/availabilities?date=eq.{}", request.date);
                let result: Vec<Availability> = self
                    .supabase
                    .request_returning(Method::PATCH, &path, Some(auth_token), Some(body))
                    .await?;

                result.into_iter().next().ok_or_else(|| {
                    StoreError::NotFound("availability row vanished during update".to_string())
                })?
            }
            None => {
                let slots = validated.unwrap_or_default();
                let body = json!({
                    "date": request.date,
                    "time_slots": slots,
                    "created_at": Utc::now().to_rfc3339(),
                    "updated_at": Utc::now().to_rfc3339(),
                });

                let result: Vec<Availability> = self
                    .supabase
                    .request_returning(
                        Method::POST,
                        "/rest/v1/availabilities",
                        Some(auth_token),
                        Some(body),
                    )
                    .await?;

                result.into_iter().next().ok_or_else(|| StoreError::Api {
                    status: 500,
                    message: "availability insert returned no representation".to_string(),
                })?
            }
        };

        info!(
            "Availability for {} now offers {} slot(s)",
            availability.date,
            availability.time_slots.len()
        );
        Ok(availability)
    }

    /// All availability rows, oldest date first.
    pub async fn list_availability(
        &self,
        auth_token: &str,
    ) -> Result<Vec<Availability>, BookingError> {
        let result: Vec<Availability> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/availabilities?order=date.asc",
                Some(auth_token),
                None,
            )
            .await?;

        Ok(result)
    }

    pub async fn delete_availability(
        &self,
        date: NaiveDate,
        auth_token: &str,
    ) -> Result<(), BookingError> {
        debug!("Deleting availability for {}", date);

        let path = format!("/rest/v1/availabilities?date=eq.{}", date);
        let _: Vec<serde_json::Value> = self
            .supabase
            .request_returning(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        Ok(())
    }

    async fn find_by_date(
        &self,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Option<Availability>, BookingError> {
        let path = format!("/rest/v1/availabilities?date=eq.{}", date);
        let result: Vec<Availability> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        Ok(result.into_iter().next())
    }
}
