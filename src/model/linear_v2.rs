//! Linear V2 range model: linear in the numeric features, scaled by a
//! per-traffic-level factor.
//!
//! Formula: range_km = (dot(weights, numerics) + intercept) * traffic_factor,
//! clamped to >= 0. Mirrors the multiplicative traffic impact used when the
//! synthetic training set is generated.

use crate::features::{TrafficStatus, TripFeatures};
use crate::model::{RangeModel, schema};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrafficFactors {
    pub light: f64,
    pub moderate: f64,
    pub heavy: f64,
}

impl Default for TrafficFactors {
    fn default() -> Self {
        Self {
            light: 1.0,
            moderate: 0.9,
            heavy: 0.7,
        }
    }
}

impl TrafficFactors {
    pub fn factor(&self, status: TrafficStatus) -> f64 {
        match status {
            TrafficStatus::Light => self.light,
            TrafficStatus::Moderate => self.moderate,
            TrafficStatus::Heavy => self.heavy,
        }
    }
}

/// Linear V2 model parameters over the numeric schema columns only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearV2Params {
    /// One weight per numeric schema column, in schema order.
    pub weights: Vec<f64>,
    pub intercept: f64,
    #[serde(default)]
    pub traffic_factors: TrafficFactors,
}

#[derive(Debug)]
pub struct LinearV2Model {
    params: LinearV2Params,
}

impl LinearV2Model {
    pub fn new(params: LinearV2Params) -> Self {
        Self { params }
    }
}

impl RangeModel for LinearV2Model {
    fn predict(&self, features: &TripFeatures) -> f64 {
        let row = schema::encode(features);
        let dot: f64 = row[..schema::NUMERIC_COUNT]
            .iter()
            .zip(self.params.weights.iter())
            .map(|(x, w)| x * w)
            .sum();
        let factor = self.params.traffic_factors.factor(features.traffic_status);
        ((dot + self.params.intercept) * factor).max(0.0)
    }

    fn kind(&self) -> &'static str {
        "linear_v2"
    }
}
