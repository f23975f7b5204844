//! Synthetic training set generation and least-squares fitting.
//!
//! The generating formula is hand-picked, not derived from real telemetry:
//! base range scales with battery capacity, minus temperature, uphill
//! elevation, speed-squared, wind and AC penalties, scaled by a traffic
//! factor. Before any production use the formula would need validation
//! against real vehicle data.

use crate::features::{RawTripInputs, TrafficStatus, TripFeatures};
use crate::model::linear_v1::LinearV1Params;
use crate::model::{ModelError, schema};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const DEFAULT_SAMPLE_COUNT: usize = 10_000;
pub const DEFAULT_SEED: u64 = 42;

// One-hot columns are collinear with the intercept, so the plain normal
// matrix is singular. A small ridge term keeps the solve well-conditioned.
const RIDGE: f64 = 1e-3;

#[derive(Debug, Clone)]
pub struct SyntheticSample {
    pub features: TripFeatures,
    pub range_km: f64,
}

/// Generate a reproducible synthetic training set.
pub fn generate_dataset(count: usize, seed: u64) -> Vec<SyntheticSample> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut samples = Vec::with_capacity(count);

    for _ in 0..count {
        let traffic_status = match rng.random_range(0..3) {
            0 => TrafficStatus::Light,
            1 => TrafficStatus::Moderate,
            _ => TrafficStatus::Heavy,
        };
        let raw = RawTripInputs {
            battery_temp_c: rng.random_range(0.0..40.0),
            current_charging_pct: rng.random_range(0.0..100.0),
            soc_pct: rng.random_range(0.0..100.0),
            battery_capacity_kwh: rng.random_range(50.0..100.0),
            elevation_change_m: rng.random_range(-100.0..1000.0),
            traffic_status,
            speed_kmh: rng.random_range(0.0..120.0),
            wind_speed_kmh: rng.random_range(0.0..30.0),
            ac_usage: rng.random_range(0..2) == 1,
        };
        let features = TripFeatures::assemble(raw).expect("generated inputs are in range");
        let range_km = generating_formula(&features);
        samples.push(SyntheticSample { features, range_km });
    }

    samples
}

/// The hand-picked range formula the synthetic targets are drawn from.
pub fn generating_formula(features: &TripFeatures) -> f64 {
    let base = features.battery_capacity_kwh * 5.0
        - features.battery_temp_c * 0.5
        - features.elevation_change_m.max(0.0) * 0.02
        - features.speed_kmh.powi(2) * 0.001
        - features.wind_speed_kmh * 0.5
        - if features.ac_usage { 10.0 } else { 0.0 };

    let factor = match features.traffic_status {
        TrafficStatus::Light => 1.0,
        TrafficStatus::Moderate => 0.9,
        TrafficStatus::Heavy => 0.7,
    };

    (base * factor).max(0.0)
}

/// Fit linear V1 weights by ridge-regularized ordinary least squares.
pub fn fit_linear_v1(samples: &[SyntheticSample]) -> Result<LinearV1Params, ModelError> {
    if samples.is_empty() {
        return Err(ModelError::Invalid(
            "cannot fit a model on an empty training set".to_string(),
        ));
    }

    // Augmented design: schema columns plus a trailing intercept column.
    const D: usize = schema::FEATURE_COUNT + 1;
    let mut xtx = [[0.0f64; D]; D];
    let mut xty = [0.0f64; D];

    for sample in samples {
        let encoded = schema::encode(&sample.features);
        let mut row = [1.0f64; D];
        row[..schema::FEATURE_COUNT].copy_from_slice(&encoded);

        for i in 0..D {
            for j in 0..D {
                xtx[i][j] += row[i] * row[j];
            }
            xty[i] += row[i] * sample.range_km;
        }
    }

    for (i, row) in xtx.iter_mut().enumerate() {
        row[i] += RIDGE;
    }

    let solution = solve(&mut xtx, &mut xty)
        .ok_or_else(|| ModelError::Invalid("normal equations are singular".to_string()))?;

    Ok(LinearV1Params {
        weights: solution[..schema::FEATURE_COUNT].to_vec(),
        intercept: solution[schema::FEATURE_COUNT],
    })
}

/// Gaussian elimination with partial pivoting.
fn solve<const D: usize>(a: &mut [[f64; D]; D], b: &mut [f64; D]) -> Option<[f64; D]> {
    for col in 0..D {
        let pivot = (col..D).max_by(|&i, &j| {
            a[i][col]
                .abs()
                .partial_cmp(&a[j][col].abs())
                .unwrap_or(std::cmp::Ordering::Equal)
        })?;
        if a[pivot][col].abs() < f64::EPSILON {
            return None;
        }
        a.swap(col, pivot);
        b.swap(col, pivot);

        for row in (col + 1)..D {
            let factor = a[row][col] / a[col][col];
            for k in col..D {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    let mut x = [0.0f64; D];
    for col in (0..D).rev() {
        let mut sum = b[col];
        for k in (col + 1)..D {
            sum -= a[col][k] * x[k];
        }
        x[col] = sum / a[col][col];
    }
    Some(x)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RangeModel;
    use crate::model::linear_v1::LinearV1Model;

    #[test]
    fn dataset_is_reproducible_for_a_seed() {
        let first = generate_dataset(50, 7);
        let second = generate_dataset(50, 7);

        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.features, b.features);
            assert_eq!(a.range_km, b.range_km);
        }
    }

    #[test]
    fn generated_targets_are_non_negative() {
        for sample in generate_dataset(500, 1) {
            assert!(sample.range_km >= 0.0);
        }
    }

    #[test]
    fn fit_recovers_a_linear_target() {
        // Targets built from an exactly linear function of the features, so
        // the fit should reproduce them almost perfectly.
        let samples: Vec<SyntheticSample> = generate_dataset(200, 3)
            .into_iter()
            .map(|mut sample| {
                sample.range_km = 4.0 * sample.features.battery_capacity_kwh
                    - 0.3 * sample.features.speed_kmh
                    + 25.0;
                sample
            })
            .collect();

        let params = fit_linear_v1(&samples).expect("fit succeeds");
        let model = LinearV1Model::new(params);

        for sample in &samples {
            let predicted = model.predict(&sample.features);
            assert!(
                (predicted - sample.range_km).abs() < 0.1,
                "predicted {predicted}, expected {}",
                sample.range_km
            );
        }
    }

    #[test]
    fn fit_on_synthetic_set_produces_usable_model() {
        let samples = generate_dataset(2_000, DEFAULT_SEED);
        let params = fit_linear_v1(&samples).expect("fit succeeds");

        assert!(params.weights.iter().all(|w| w.is_finite()));
        assert!(params.intercept.is_finite());

        let model = LinearV1Model::new(params);
        let typical = TripFeatures::assemble(RawTripInputs {
            battery_temp_c: 25.0,
            current_charging_pct: 50.0,
            soc_pct: 80.0,
            battery_capacity_kwh: 75.0,
            elevation_change_m: 100.0,
            traffic_status: TrafficStatus::Moderate,
            speed_kmh: 60.0,
            wind_speed_kmh: 10.0,
            ac_usage: true,
        })
        .expect("valid features");

        let predicted = model.predict(&typical);
        assert!(predicted > 0.0 && predicted.is_finite());
    }

    #[test]
    fn fit_rejects_empty_training_set() {
        assert!(matches!(
            fit_linear_v1(&[]),
            Err(ModelError::Invalid(_))
        ));
    }
}
