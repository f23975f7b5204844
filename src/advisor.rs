//! Charging recommendation policy.
//!
//! Fixed thresholds: a trip is comfortable with a 20% range buffer; below
//! 20% state of charge the battery should be charged immediately for battery
//! health; otherwise charge to the percentage needed for the trip, capped at
//! 80%.

use serde::{Deserialize, Serialize};

const RANGE_BUFFER: f64 = 1.2;
const LOW_SOC_PCT: f64 = 20.0;
const MAX_CHARGE_PCT: f64 = 80.0;

/// Tagged charging advice so callers branch exhaustively instead of matching
/// on text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "target_percent", rename_all = "snake_case")]
pub enum ChargingRecommendation {
    NoChargeNeeded,
    ChargeImmediately,
    ChargeToPercent(u8),
}

/// Derive a charging recommendation from current state of charge, predicted
/// range and trip distance (all trusted to be finite and non-negative by the
/// caller's validation).
pub fn recommend(
    current_soc_pct: f64,
    predicted_range_km: f64,
    trip_distance_km: f64,
) -> ChargingRecommendation {
    if predicted_range_km >= trip_distance_km * RANGE_BUFFER {
        return ChargingRecommendation::NoChargeNeeded;
    }
    if current_soc_pct < LOW_SOC_PCT {
        return ChargingRecommendation::ChargeImmediately;
    }
    if predicted_range_km <= 0.0 {
        // No usable range estimate; charging to a percentage is meaningless.
        return ChargingRecommendation::ChargeImmediately;
    }

    let needed = (trip_distance_km / predicted_range_km * 100.0).min(MAX_CHARGE_PCT);
    ChargingRecommendation::ChargeToPercent(needed.round() as u8)
}
