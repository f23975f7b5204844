//! Linear V1 range model over the full one-hot feature vector.
//!
//! Formula: range_km = dot(weights, encoded_features) + intercept, clamped to >= 0.

use crate::features::TripFeatures;
use crate::model::{RangeModel, schema};
use serde::{Deserialize, Serialize};

/// Linear V1 model parameters, aligned to the static feature schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearV1Params {
    /// One weight per schema column, in schema order.
    pub weights: Vec<f64>,
    pub intercept: f64,
}

#[derive(Debug)]
pub struct LinearV1Model {
    params: LinearV1Params,
}

impl LinearV1Model {
    pub fn new(params: LinearV1Params) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &LinearV1Params {
        &self.params
    }
}

impl RangeModel for LinearV1Model {
    fn predict(&self, features: &TripFeatures) -> f64 {
        let row = schema::encode(features);
        let dot: f64 = row
            .iter()
            .zip(self.params.weights.iter())
            .map(|(x, w)| x * w)
            .sum();
        (dot + self.params.intercept).max(0.0)
    }

    fn kind(&self) -> &'static str {
        "linear_v1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::{RawTripInputs, TrafficStatus, TripFeatures};

    fn features() -> TripFeatures {
        TripFeatures::assemble(RawTripInputs {
            battery_temp_c: 20.0,
            current_charging_pct: 50.0,
            soc_pct: 80.0,
            battery_capacity_kwh: 75.0,
            elevation_change_m: 0.0,
            traffic_status: TrafficStatus::Light,
            speed_kmh: 60.0,
            wind_speed_kmh: 0.0,
            ac_usage: false,
        })
        .expect("valid features")
    }

    #[test]
    fn predict_applies_weights_and_intercept() {
        let mut weights = vec![0.0; schema::FEATURE_COUNT];
        weights[3] = 4.0; // battery_capacity
        let model = LinearV1Model::new(LinearV1Params {
            weights,
            intercept: 10.0,
        });

        assert_eq!(model.predict(&features()), 75.0 * 4.0 + 10.0);
    }

    #[test]
    fn predict_clamps_negative_output_to_zero() {
        let model = LinearV1Model::new(LinearV1Params {
            weights: vec![0.0; schema::FEATURE_COUNT],
            intercept: -50.0,
        });

        assert_eq!(model.predict(&features()), 0.0);
    }

    #[test]
    fn predict_is_deterministic() {
        let mut weights = vec![0.1; schema::FEATURE_COUNT];
        weights[0] = -0.5;
        let model = LinearV1Model::new(LinearV1Params {
            weights,
            intercept: 120.0,
        });

        let first = model.predict(&features());
        for _ in 0..10 {
            assert_eq!(model.predict(&features()), first);
        }
    }
}
