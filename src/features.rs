//! Trip feature record fed to the range model.
//!
//! A `TripFeatures` value is assembled once per prediction request and is
//! immutable after validation. Validation is strict: non-finite numbers and
//! unrecognized traffic labels are rejected rather than defaulted.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coarse three-level congestion classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrafficStatus {
    Light,
    Moderate,
    Heavy,
}

impl TrafficStatus {
    /// Parse a traffic label. Unknown labels are a usage error, never defaulted.
    pub fn from_label(label: &str) -> Result<Self, ValidationError> {
        match label.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Self::Light),
            "moderate" => Ok(Self::Moderate),
            "heavy" => Ok(Self::Heavy),
            _ => Err(ValidationError::UnknownTrafficLabel(label.to_string())),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Moderate => "Moderate",
            Self::Heavy => "Heavy",
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("{field} out of range: {reason}")]
    OutOfRange {
        field: &'static str,
        reason: String,
    },
    #[error("unrecognized traffic label: {0:?}")]
    UnknownTrafficLabel(String),
}

/// Validated feature record for one prediction request.
#[derive(Debug, Clone, PartialEq)]
pub struct TripFeatures {
    pub battery_temp_c: f64,
    pub current_charging_pct: f64,
    pub soc_pct: f64,
    pub battery_capacity_kwh: f64,
    pub elevation_change_m: f64,
    pub traffic_status: TrafficStatus,
    pub speed_kmh: f64,
    pub wind_speed_kmh: f64,
    pub ac_usage: bool,
}

/// Raw scalar inputs before validation, as collected upstream.
#[derive(Debug, Clone)]
pub struct RawTripInputs {
    pub battery_temp_c: f64,
    pub current_charging_pct: f64,
    pub soc_pct: f64,
    pub battery_capacity_kwh: f64,
    pub elevation_change_m: f64,
    pub traffic_status: TrafficStatus,
    pub speed_kmh: f64,
    pub wind_speed_kmh: f64,
    pub ac_usage: bool,
}

impl TripFeatures {
    /// Validate raw inputs into an immutable feature record.
    pub fn assemble(raw: RawTripInputs) -> Result<Self, ValidationError> {
        require_finite("battery_temp_c", raw.battery_temp_c)?;
        require_percent("current_charging_pct", raw.current_charging_pct)?;
        require_percent("soc_pct", raw.soc_pct)?;
        require_finite("battery_capacity_kwh", raw.battery_capacity_kwh)?;
        if raw.battery_capacity_kwh <= 0.0 {
            return Err(ValidationError::OutOfRange {
                field: "battery_capacity_kwh",
                reason: format!("must be > 0, got {}", raw.battery_capacity_kwh),
            });
        }
        require_finite("elevation_change_m", raw.elevation_change_m)?;
        require_non_negative("speed_kmh", raw.speed_kmh)?;
        require_non_negative("wind_speed_kmh", raw.wind_speed_kmh)?;

        Ok(Self {
            battery_temp_c: raw.battery_temp_c,
            current_charging_pct: raw.current_charging_pct,
            soc_pct: raw.soc_pct,
            battery_capacity_kwh: raw.battery_capacity_kwh,
            elevation_change_m: raw.elevation_change_m,
            traffic_status: raw.traffic_status,
            speed_kmh: raw.speed_kmh,
            wind_speed_kmh: raw.wind_speed_kmh,
            ac_usage: raw.ac_usage,
        })
    }
}

fn require_finite(field: &'static str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ValidationError::NotFinite { field, value })
    }
}

fn require_percent(field: &'static str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            reason: format!("must be within 0-100, got {value}"),
        })
    }
}

fn require_non_negative(field: &'static str, value: f64) -> Result<(), ValidationError> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::OutOfRange {
            field,
            reason: format!("must be >= 0, got {value}"),
        })
    }
}
