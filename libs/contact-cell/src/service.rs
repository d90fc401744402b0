use reqwest::Method;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};

use crate::models::{ContactError, ContactMessage, SubmitContactRequest};

pub struct ContactService {
    supabase: SupabaseClient,
}

impl ContactService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
        }
    }

    /// Store a message from the public contact form. Anonymous write; the
    /// form is open to visitors.
    pub async fn submit(&self, request: SubmitContactRequest) -> Result<ContactMessage, ContactError> {
        debug!("Storing contact message from {}", request.email);

        let body = json!({
            "name": request.name,
            "email": request.email,
            "message": request.message,
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        let result: Vec<ContactMessage> = self
            .supabase
            .request_returning(Method::POST, "/rest/v1/contact_messages", None, Some(body))
            .await?;

        result.into_iter().next().ok_or_else(|| {
            ContactError::Store(StoreError::Api {
                status: 500,
                message: "contact message insert returned no representation".to_string(),
            })
        })
    }

    /// The inbox, newest first.
    pub async fn list_messages(&self, auth_token: &str) -> Result<Vec<ContactMessage>, ContactError> {
        let result: Vec<ContactMessage> = self
            .supabase
            .request(
                Method::GET,
                "/rest/v1/contact_messages?order=created_at.desc",
                Some(auth_token),
                None,
            )
            .await?;

        Ok(result)
    }

    /// Mark a message as handled by deleting it. Unknown ids are reported,
    /// not ignored.
    pub async fn solve_message(&self, message_id: Uuid, auth_token: &str) -> Result<(), ContactError> {
        let path = format!("/rest/v1/contact_messages?id=eq.{}", message_id);
        let deleted: Vec<ContactMessage> = self
            .supabase
            .request_returning(Method::DELETE, &path, Some(auth_token), None)
            .await?;

        if deleted.is_empty() {
            return Err(ContactError::NotFound);
        }

        info!("Contact message {} solved and removed", message_id);
        Ok(())
    }
}
