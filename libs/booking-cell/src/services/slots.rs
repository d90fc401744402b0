use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use reqwest::Method;
use tracing::debug;

use shared_config::AppConfig;
use shared_database::supabase::SupabaseClient;

use crate::models::{Appointment, Availability, BookingError};

/// Read side of the booking engine: which time labels are still open for a
/// given date. Every call re-reads availability and appointment state; at
/// this request volume a cache would buy nothing.
pub struct SlotQueryService {
    supabase: Arc<SupabaseClient>,
}

impl SlotQueryService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: Arc::new(SupabaseClient::new(config)),
        }
    }

    pub fn with_client(supabase: Arc<SupabaseClient>) -> Self {
        Self { supabase }
    }

    /// Parse a caller-supplied date string. Malformed input is a client
    /// error, never a server fault.
    pub fn parse_date(raw: &str) -> Result<NaiveDate, BookingError> {
        NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
            .map_err(|_| BookingError::InvalidDate(raw.to_string()))
    }

    /// The date's offered labels minus every label already claimed by an
    /// appointment on that date. Stored (administrator) order is preserved;
    /// no re-sort is imposed. No availability row means no slots.
    pub async fn available_times(
        &self,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<String>, BookingError> {
        let Some(availability) = self.find_availability(date, auth_token).await? else {
            debug!("No availability defined for {}", date);
            return Ok(Vec::new());
        };

        let appointments = self.appointments_on(date, auth_token).await?;
        let taken: HashSet<&str> = appointments.iter().map(|a| a.time.as_str()).collect();

        let open: Vec<String> = availability
            .time_slots
            .into_iter()
            .filter(|label| !taken.contains(label.as_str()))
            .collect();

        debug!("{} of the day's slots remain open for {}", open.len(), date);
        Ok(open)
    }

    async fn find_availability(
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

    async fn appointments_on(
        &self,
        date: NaiveDate,
        auth_token: Option<&str>,
    ) -> Result<Vec<Appointment>, BookingError> {
        let path = format!("/rest/v1/appointments?date=eq.{}&order=time.asc", date);
        let result: Vec<Appointment> = self
            .supabase
            .request(Method::GET, &path, auth_token, None)
            .await?;

        Ok(result)
    }
}
