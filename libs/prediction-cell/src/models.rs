use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shared_database::supabase::StoreError;

// ==============================================================================
// PREDICTION MODELS
// ==============================================================================

/// Policyholder-supplied features for a charge estimate.
#[derive(Debug, Clone, Deserialize)]
pub struct PredictionInput {
    pub age: i32,
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub num_children: i32,
    pub smoker: String,
    pub region: String,
}

impl PredictionInput {
    pub fn validate(&self) -> Result<(), PredictionError> {
        if self.age <= 0 {
            return Err(PredictionError::Validation("age must be positive".to_string()));
        }
        if self.height_cm <= 0.0 {
            return Err(PredictionError::Validation("height_cm must be positive".to_string()));
        }
        if self.weight_kg <= 0.0 {
            return Err(PredictionError::Validation("weight_kg must be positive".to_string()));
        }
        if self.num_children < 0 {
            return Err(PredictionError::Validation(
                "num_children must not be negative".to_string(),
            ));
        }
        Ok(())
    }

    /// Body mass index in kg/m², rounded to two decimals.
    pub fn bmi(&self) -> f64 {
        let height_m = self.height_cm / 100.0;
        let bmi = self.weight_kg / (height_m * height_m);
        (bmi * 100.0).round() / 100.0
    }

    /// Category label in the form the regression model was trained on
    /// (French dataset labels).
    pub fn bmi_category(&self) -> &'static str {
        let bmi = self.bmi();
        if bmi < 18.5 {
            "Poids insuffisant"
        } else if bmi < 25.0 {
            "Poids normal"
        } else if bmi < 30.0 {
            "Surpoids"
        } else {
            "Obésité"
        }
    }
}

/// Feature vector sent to the model server.
#[derive(Debug, Clone, Serialize)]
pub struct ChargeFeatures {
    pub age: i32,
    pub sex: String,
    pub bmi: f64,
    pub bmi_category: String,
    pub children: i32,
    pub smoker: String,
    pub region: String,
}

impl ChargeFeatures {
    pub fn from_input(input: &PredictionInput) -> Self {
        Self {
            age: input.age,
            sex: input.sex.clone(),
            bmi: input.bmi(),
            bmi_category: input.bmi_category().to_string(),
            children: input.num_children,
            smoker: input.smoker.clone(),
            region: input.region.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ModelPrediction {
    pub prediction: f64,
}

/// One stored estimate, kept so policyholders can review earlier quotes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredictionHistory {
    pub id: Uuid,
    pub user_id: Uuid,
    pub age: i32,
    pub sex: String,
    pub height_cm: f64,
    pub weight_kg: f64,
    pub bmi: f64,
    pub bmi_category: String,
    pub num_children: i32,
    pub smoker: String,
    pub region: String,
    pub predicted_charges: f64,
    pub created_at: DateTime<Utc>,
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("model server is not configured")]
    NotConfigured,

    #[error("invalid prediction input: {0}")]
    Validation(String),

    #[error("model server error: {message}")]
    ModelApi { message: String },

    #[error("model server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error(transparent)]
    Store(#[from] StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn input() -> PredictionInput {
        PredictionInput {
            age: 30,
            sex: "male".to_string(),
            height_cm: 175.0,
            weight_kg: 70.0,
            num_children: 2,
            smoker: "no".to_string(),
            region: "northeast".to_string(),
        }
    }

    #[test]
    fn bmi_is_rounded_to_two_decimals() {
        assert_eq!(input().bmi(), 22.86);
    }

    #[test]
    fn bmi_categories_follow_dataset_labels() {
        let mut thin = input();
        thin.weight_kg = 50.0;
        assert_eq!(thin.bmi_category(), "Poids insuffisant");

        assert_eq!(input().bmi_category(), "Poids normal");

        let mut heavy = input();
        heavy.weight_kg = 85.0;
        assert_eq!(heavy.bmi_category(), "Surpoids");

        let mut obese = input();
        obese.weight_kg = 100.0;
        assert_eq!(obese.bmi_category(), "Obésité");
    }

    #[test]
    fn validation_names_the_offending_field() {
        let mut bad_age = input();
        bad_age.age = -35;
        assert_matches!(bad_age.validate(), Err(PredictionError::Validation(msg)) => {
            assert!(msg.contains("age"));
        });

        let mut bad_height = input();
        bad_height.height_cm = -180.0;
        assert_matches!(bad_height.validate(), Err(PredictionError::Validation(msg)) => {
            assert!(msg.contains("height_cm"));
        });

        let mut bad_children = input();
        bad_children.num_children = -2;
        assert_matches!(bad_children.validate(), Err(PredictionError::Validation(msg)) => {
            assert!(msg.contains("num_children"));
        });
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
    }
}
