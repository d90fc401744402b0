use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};

use crate::models::{ApplyRequest, CareersError, Job, JobApplication};

pub struct CareersService {
    supabase: SupabaseClient,
}

impl CareersService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Open positions, newest posting first.
    pub async fn list_jobs(&self) -> Result<Vec<Job>, CareersError> {
        let result: Vec<Job> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/jobs?order=created_at.desc",
                None,
                None,
            )
            .await?;

        Ok(result)
    }

    /// Store an application. The referenced job must exist; dangling
    /// applications are rejected up front.
    pub async fn apply(&self, request: ApplyRequest) -> Result<JobApplication, CareersError> {
        debug!("Application from {} for job {}", request.email, request.job_id);

        let path = format!("/rest/v1/jobs?id=eq.{}", request.job_id);
        let jobs: Vec<Job> = self.supabase.request(Method::GET, &path, None, None).await?;

        let job = jobs.into_iter().next().ok_or(CareersError::JobNotFound)?;

        let body = json!({
            "job_id": request.job_id,
            "name": request.name,
            "email": request.email,
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        let result: Vec<JobApplication> = self
            .supabase
            .request_returning(Method::POST, "/rest/v1/job_applications", None, Some(body))
            .await?;

        let application = result.into_iter().next().ok_or_else(|| {
            CareersError::Store(StoreError::Api {
                status: 500,
                message: "application insert returned no representation".to_string(),
            })
        })?;

        info!("Application {} received for \"{}\"", application.id, job.title);
        Ok(application)
    }
}
