use reqwest::Method;
use serde_json::json;
use tracing::info;
use uuid::Uuid;

use shared_config::AppConfig;
use shared_database::supabase::{StoreError, SupabaseClient};

use crate::models::{ChargeFeatures, PredictionError, PredictionHistory, PredictionInput};
use crate::services::model::ModelServerClient;

pub struct ChargePredictionService {
    supabase: SupabaseClient,
    model: Option<ModelServerClient>,
}

impl ChargePredictionService {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            supabase: SupabaseClient::new(config),
            model: ModelServerClient::new(config).ok(),
        }
    }

    /// Validate, predict, persist. The stored row is the caller's receipt;
    /// estimates are never recomputed from it.
    pub async fn predict_charges(
        &self,
        user_id: Uuid,
        input: PredictionInput,
        auth_token: &str,
    ) -> Result<PredictionHistory, PredictionError> {
        input.validate()?;

        let model = self.model.as_ref().ok_or(PredictionError::NotConfigured)?;
        let features = ChargeFeatures::from_input(&input);
        let predicted_charges = model.predict(&features).await?;

        info!(
            "Predicted charges {:.2} for user {} (bmi {})",
            predicted_charges, user_id, features.bmi
        );

        let body = json!({
            "user_id": user_id,
            "age": input.age,
            "sex": input.sex,
            "height_cm": input.height_cm,
            "weight_kg": input.weight_kg,
            "bmi": features.bmi,
            "bmi_category": features.bmi_category,
            "num_children": input.num_children,
            "smoker": input.smoker,
            "region": input.region,
            "predicted_charges": predicted_charges,
            "created_at": chrono::Utc::now().to_rfc3339(),
        });

        let rows: Vec<PredictionHistory> = self
            .supabase
            .request_returning(
                Method::POST,
                "/rest/v1/prediction_history",
                Some(auth_token),
                Some(body),
            )
            .await?;

        rows.into_iter().next().ok_or_else(|| {
            PredictionError::Store(StoreError::Api {
                status: 500,
                message: "prediction insert returned no representation".to_string(),
            })
        })
    }

    /// The caller's past estimates, newest first.
    pub async fn history(
        &self,
        user_id: Uuid,
        auth_token: &str,
    ) -> Result<Vec<PredictionHistory>, PredictionError> {
        let path = format!(
            "/rest/v1/prediction_history?user_id=eq.{}&order=created_at.desc",
            user_id
        );
        let rows: Vec<PredictionHistory> = self
            .supabase
            .request(Method::GET, &path, Some(auth_token), None)
            .await?;

        Ok(rows)
    }
}
