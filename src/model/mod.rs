//! Range model loading and the `RangeModel` trait.
//!
//! The trained model is an immutable artifact loaded once at startup and
//! shared read-only across predictions. A missing or corrupt artifact is
//! fatal at startup, never worked around at prediction time.

use crate::features::TripFeatures;
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub mod linear_v1;
pub mod linear_v2;
pub mod schema;
pub mod synthetic;

use linear_v1::{LinearV1Model, LinearV1Params};
use linear_v2::{LinearV2Model, LinearV2Params};

/// Trait for trained regression models mapping trip features to a range
/// estimate in kilometers.
///
/// Implementations must be deterministic for fixed parameters and must never
/// return a negative or non-finite value.
pub trait RangeModel: Send + Sync + std::fmt::Debug {
    /// Predicted driving range in kilometers, always >= 0.
    fn predict(&self, features: &TripFeatures) -> f64;

    /// Model kind identifier matching the artifact's `model` field.
    fn kind(&self) -> &'static str;
}

/// On-disk model artifact: kind, training column order, and parameters.
#[derive(Debug, Deserialize)]
pub struct ModelFile {
    pub model: String,
    pub feature_names: Vec<String>,
    pub params: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("failed to read model artifact: {0}")]
    Read(#[from] std::io::Error),
    #[error("failed to parse model artifact: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid model artifact: {0}")]
    Invalid(String),
    #[error("artifact feature columns do not match the built-in schema")]
    SchemaMismatch,
}

// Model factory
pub fn create_model(file: &ModelFile) -> Result<Box<dyn RangeModel>, ModelError> {
    if !schema::matches_schema(&file.feature_names) {
        return Err(ModelError::SchemaMismatch);
    }

    match file.model.as_str() {
        "linear_v1" => {
            let params: LinearV1Params = serde_json::from_value(file.params.clone())?;
            if params.weights.len() != schema::FEATURE_COUNT {
                return Err(ModelError::Invalid(format!(
                    "linear_v1 expects {} weights, got {}",
                    schema::FEATURE_COUNT,
                    params.weights.len()
                )));
            }
            ensure_finite(&params.weights, params.intercept)?;
            Ok(Box::new(LinearV1Model::new(params)))
        }
        "linear_v2" => {
            let params: LinearV2Params = serde_json::from_value(file.params.clone())?;
            if params.weights.len() != schema::NUMERIC_COUNT {
                return Err(ModelError::Invalid(format!(
                    "linear_v2 expects {} weights, got {}",
                    schema::NUMERIC_COUNT,
                    params.weights.len()
                )));
            }
            ensure_finite(&params.weights, params.intercept)?;
            Ok(Box::new(LinearV2Model::new(params)))
        }
        other => Err(ModelError::Invalid(format!("unknown model: {other}"))),
    }
}

fn ensure_finite(weights: &[f64], intercept: f64) -> Result<(), ModelError> {
    if weights.iter().all(|w| w.is_finite()) && intercept.is_finite() {
        Ok(())
    } else {
        Err(ModelError::Invalid(
            "model parameters must be finite".to_string(),
        ))
    }
}

pub fn load_model_from_path(path: impl AsRef<Path>) -> Result<Box<dyn RangeModel>, ModelError> {
    let contents = std::fs::read_to_string(path)?;
    let file: ModelFile = serde_json::from_str(&contents)?;
    create_model(&file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn schema_names() -> Vec<String> {
        schema::FEATURE_NAMES.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn create_linear_v1_from_artifact() {
        let file = ModelFile {
            model: "linear_v1".to_string(),
            feature_names: schema_names(),
            params: json!({
                "weights": vec![0.5; schema::FEATURE_COUNT],
                "intercept": 12.0,
            }),
        };

        let model = create_model(&file).expect("valid artifact");
        assert_eq!(model.kind(), "linear_v1");
    }

    #[test]
    fn create_linear_v2_defaults_traffic_factors() {
        let file = ModelFile {
            model: "linear_v2".to_string(),
            feature_names: schema_names(),
            params: json!({
                "weights": vec![1.0; schema::NUMERIC_COUNT],
                "intercept": 0.0,
            }),
        };

        let model = create_model(&file).expect("valid artifact");
        assert_eq!(model.kind(), "linear_v2");
    }

    #[test]
    fn unknown_model_kind_is_rejected() {
        let file = ModelFile {
            model: "random_forest_v9".to_string(),
            feature_names: schema_names(),
            params: json!({}),
        };

        assert!(matches!(
            create_model(&file),
            Err(ModelError::Invalid(_))
        ));
    }

    #[test]
    fn column_mismatch_is_rejected_at_load() {
        let mut names = schema_names();
        names.reverse();
        let file = ModelFile {
            model: "linear_v1".to_string(),
            feature_names: names,
            params: json!({
                "weights": vec![0.0; schema::FEATURE_COUNT],
                "intercept": 0.0,
            }),
        };

        assert!(matches!(
            create_model(&file),
            Err(ModelError::SchemaMismatch)
        ));
    }

    #[test]
    fn wrong_weight_count_is_rejected() {
        let file = ModelFile {
            model: "linear_v1".to_string(),
            feature_names: schema_names(),
            params: json!({
                "weights": [1.0, 2.0],
                "intercept": 0.0,
            }),
        };

        assert!(matches!(create_model(&file), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn non_finite_weights_are_rejected() {
        let mut weights = vec![0.0; schema::FEATURE_COUNT];
        weights[2] = f64::NAN;
        let file = ModelFile {
            model: "linear_v1".to_string(),
            feature_names: schema_names(),
            params: json!({
                "weights": weights,
                "intercept": 0.0,
            }),
        };

        assert!(matches!(create_model(&file), Err(ModelError::Invalid(_))));
    }

    #[test]
    fn missing_artifact_returns_read_error() {
        let result = load_model_from_path("/definitely/not/here/model.json");
        assert!(matches!(result, Err(ModelError::Read(_))));
    }
}
