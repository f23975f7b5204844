//! Statically declared feature schema shared by training and inference.
//!
//! Column order is fixed at compile time. The model artifact must list the
//! same columns in the same order; this is validated once at load time, never
//! reconciled per call. An encoding mismatch would silently produce a wrong
//! prediction, so the order here is the single source of truth.

use crate::features::{TrafficStatus, TripFeatures};

/// Training column order: numeric features first, then the one-hot traffic
/// columns in alphabetical label order.
pub const FEATURE_NAMES: [&str; FEATURE_COUNT] = [
    "battery_temp",
    "current_charging",
    "soc",
    "battery_capacity",
    "elevation",
    "speed",
    "wind_speed",
    "ac_usage",
    "traffic_status_Heavy",
    "traffic_status_Light",
    "traffic_status_Moderate",
];

pub const FEATURE_COUNT: usize = 11;
pub const NUMERIC_COUNT: usize = 8;

const TRAFFIC_HEAVY: usize = 8;
const TRAFFIC_LIGHT: usize = 9;
const TRAFFIC_MODERATE: usize = 10;

/// Encode a feature record into the training column order.
///
/// Every one-hot column starts at zero and only the active traffic column is
/// set, so categorical combinations absent from a given request are
/// zero-filled rather than missing.
pub fn encode(features: &TripFeatures) -> [f64; FEATURE_COUNT] {
    let mut row = [0.0; FEATURE_COUNT];
    row[0] = features.battery_temp_c;
    row[1] = features.current_charging_pct;
    row[2] = features.soc_pct;
    row[3] = features.battery_capacity_kwh;
    row[4] = features.elevation_change_m;
    row[5] = features.speed_kmh;
    row[6] = features.wind_speed_kmh;
    row[7] = if features.ac_usage { 1.0 } else { 0.0 };
    row[traffic_column(features.traffic_status)] = 1.0;
    row
}

fn traffic_column(status: TrafficStatus) -> usize {
    match status {
        TrafficStatus::Heavy => TRAFFIC_HEAVY,
        TrafficStatus::Light => TRAFFIC_LIGHT,
        TrafficStatus::Moderate => TRAFFIC_MODERATE,
    }
}

/// Check an artifact's column list against the static schema.
pub fn matches_schema(feature_names: &[String]) -> bool {
    feature_names.len() == FEATURE_COUNT
        && feature_names
            .iter()
            .zip(FEATURE_NAMES.iter())
            .all(|(a, b)| a == b)
}
