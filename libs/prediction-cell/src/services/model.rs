use reqwest::Client;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::{ChargeFeatures, ModelPrediction, PredictionError};

/// Client for the external charge-regression model server. The model
/// itself is an opaque collaborator; this just ships features over HTTP
/// and reads back a number.
pub struct ModelServerClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl ModelServerClient {
    pub fn new(config: &AppConfig) -> Result<Self, PredictionError> {
        if !config.is_model_server_configured() {
            return Err(PredictionError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            base_url: config.model_server_url.clone(),
            api_key: config.model_server_api_key.clone(),
        })
    }

    /// POST /v1/predict
    pub async fn predict(&self, features: &ChargeFeatures) -> Result<f64, PredictionError> {
        let url = format!("{}/v1/predict", self.base_url);
        debug!("Requesting charge prediction from {}", url);

        let response = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(features)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Model server error: {} - {}", status, response_text);
            return Err(PredictionError::ModelApi {
                message: format!("HTTP {}: {}", status, response_text),
            });
        }

        let parsed: ModelPrediction =
            serde_json::from_str(&response_text).map_err(|e| PredictionError::ModelApi {
                message: format!("unexpected model response: {}", e),
            })?;

        debug!("Model predicted charges of {}", parsed.prediction);
        Ok(parsed.prediction)
    }
}
