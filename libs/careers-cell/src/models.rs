use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::supabase::StoreError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An application submitted against an open position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobApplication {
    pub id: Uuid,
    pub job_id: Uuid,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplyRequest {
    pub name: String,
    pub email: String,
    pub job_id: Uuid,
}

#[derive(Debug, thiserror::Error)]
pub enum CareersError {
    #[error("job not found")]
    JobNotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}
