//! External trip-data collaborators: geocoding, elevation, routing/traffic
//! and charging-station lookup.
//!
//! The prediction core never talks to the network itself; it consumes these
//! traits. HTTP-backed implementations live in `google` and `elevation`,
//! deterministic mocks in `mock`.

use crate::features::TrafficStatus;
use serde::Serialize;
use thiserror::Error;
use tracing::warn;

pub mod elevation;
pub mod google;
pub mod mock;

#[derive(Debug, Error)]
pub enum TripError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{api} returned status {status}")]
    Vendor { api: &'static str, status: String },
    #[error("{api} returned no results for {query:?}")]
    NoResults { api: &'static str, query: String },
    #[error("{api} response missing {field}")]
    MissingData {
        api: &'static str,
        field: &'static str,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeocodedPlace {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
}

impl GeocodedPlace {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteStep {
    pub instruction: String,
    pub distance_text: String,
    pub duration_text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteSummary {
    pub distance_km: f64,
    pub duration_secs: u64,
    pub steps: Vec<RouteStep>,
    /// Step boundaries from origin to destination, inclusive.
    pub waypoints: Vec<GeoPoint>,
}

/// Traffic estimate for one route segment between consecutive waypoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SegmentTraffic {
    /// 1-based segment index along the route.
    pub segment: usize,
    pub status: TrafficStatus,
    /// duration_in_traffic / free-flow duration.
    pub traffic_ratio: f64,
    /// Seconds from departure until the end of this segment, in traffic.
    pub eta_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChargingStation {
    pub name: String,
    pub vicinity: String,
    pub lat: f64,
    pub lon: f64,
}

impl ChargingStation {
    pub fn point(&self) -> GeoPoint {
        GeoPoint {
            lat: self.lat,
            lon: self.lon,
        }
    }
}

pub trait Geocoder {
    fn geocode(
        &self,
        place: &str,
    ) -> impl Future<Output = Result<GeocodedPlace, TripError>> + Send;
}

pub trait ElevationService {
    fn elevation_m(&self, point: GeoPoint)
    -> impl Future<Output = Result<f64, TripError>> + Send;
}

pub trait RoutingService {
    fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> impl Future<Output = Result<RouteSummary, TripError>> + Send;

    fn segment_traffic(
        &self,
        waypoints: &[GeoPoint],
    ) -> impl Future<Output = Result<Vec<SegmentTraffic>, TripError>> + Send;
}

pub trait StationLocator {
    fn stations_near(
        &self,
        point: GeoPoint,
        radius_m: u32,
    ) -> impl Future<Output = Result<Vec<ChargingStation>, TripError>> + Send;
}

/// Classify congestion from the ratio of in-traffic to free-flow duration.
pub fn classify_traffic(traffic_ratio: f64) -> TrafficStatus {
    if traffic_ratio > 1.5 {
        TrafficStatus::Heavy
    } else if traffic_ratio > 1.2 {
        TrafficStatus::Moderate
    } else {
        TrafficStatus::Light
    }
}

/// Union of stations found near each waypoint, deduplicated by name and
/// vicinity. A failed lookup for one waypoint skips that waypoint rather than
/// failing the whole search.
pub async fn stations_along_route<S: StationLocator>(
    locator: &S,
    waypoints: &[GeoPoint],
    radius_m: u32,
) -> Vec<ChargingStation> {
    let mut stations: Vec<ChargingStation> = Vec::new();
    for waypoint in waypoints {
        match locator.stations_near(*waypoint, radius_m).await {
            Ok(found) => {
                for station in found {
                    let duplicate = stations
                        .iter()
                        .any(|s| s.name == station.name && s.vicinity == station.vicinity);
                    if !duplicate {
                        stations.push(station);
                    }
                }
            }
            Err(err) => {
                warn!(
                    lat = waypoint.lat,
                    lon = waypoint.lon,
                    error = %err,
                    "Charging station lookup failed for waypoint"
                );
            }
        }
    }
    stations
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ratio_above_heavy_threshold_is_heavy() {
        assert_eq!(classify_traffic(1.51), TrafficStatus::Heavy);
    }

    #[test]
    fn ratio_above_moderate_threshold_is_moderate() {
        assert_eq!(classify_traffic(1.3), TrafficStatus::Moderate);
    }

    #[test]
    fn thresholds_are_exclusive() {
        assert_eq!(classify_traffic(1.5), TrafficStatus::Moderate);
        assert_eq!(classify_traffic(1.2), TrafficStatus::Light);
    }

    #[test]
    fn free_flow_is_light() {
        assert_eq!(classify_traffic(1.0), TrafficStatus::Light);
    }
}
