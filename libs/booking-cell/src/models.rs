use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use shared_database::supabase::StoreError;

// ==============================================================================
// CORE BOOKING MODELS
// ==============================================================================

/// Administrator-defined supply of bookable time labels for one calendar
/// date. `time_slots` is never null once persisted; it may be empty, and
/// duplicates are not rejected. Labels are opaque tokens (`"09:00"`), not
/// semantically validated times.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Availability {
    pub id: Uuid,
    pub date: NaiveDate,
    pub time_slots: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Availability {
    /// Human-readable rendering of the slot list for back-office screens,
    /// e.g. `["09:00", "10:00"]` -> `"09:00, 10:00"`.
    pub fn display_times(&self) -> String {
        self.time_slots.join(", ")
    }
}

/// One confirmed booking consuming a `(date, time)` slot for one account.
/// Created on successful booking and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub time: String,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// REQUEST MODELS
// ==============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct BookAppointmentRequest {
    pub date: NaiveDate,
    pub time: String,
    pub reason: Option<String>,
}

/// Staff payload for defining a date's slot list.
///
/// `time_slots` is double-optional so the validator can tell the three
/// submission states apart: key absent, key present but null, key present
/// with a list.
#[derive(Debug, Clone, Deserialize)]
pub struct UpsertAvailabilityRequest {
    pub date: NaiveDate,
    #[serde(default, deserialize_with = "double_option")]
    pub time_slots: Option<Option<Vec<String>>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<Vec<String>>>, D::Error>
where
    D: Deserializer<'de>,
{
    Deserialize::deserialize(deserializer).map(Some)
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum BookingError {
    /// The submission never supplied the `time_slots` key at all.
    #[error("time_slots field is missing from the submission")]
    MissingTimeSlots,

    /// Caller-supplied date string that does not parse as `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The requested `(date, time)` is not currently bookable: no
    /// availability for the date, the label is not offered, or the slot is
    /// already taken.
    #[error("appointment slot not available")]
    SlotUnavailable,

    #[error(transparent)]
    Store(#[from] StoreError),
}
