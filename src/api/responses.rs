use crate::advisor::ChargingRecommendation;
use crate::features::TrafficStatus;
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TripSuccessResponse {
    pub source: PlaceResponse,
    pub destination: PlaceResponse,
    pub elevation_change_m: f64,
    pub distance_km: f64,
    pub duration_secs: u64,
    pub average_speed_kmh: f64,
    pub predicted_range_km: f64,
    pub recommendation: ChargingRecommendation,
    pub traffic: Vec<TrafficSegmentResponse>,
    pub steps: Vec<RouteStepResponse>,
    pub stations: Vec<StationResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub best_station: Option<StationResponse>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PlaceResponse {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation_m: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TrafficSegmentResponse {
    pub segment: usize,
    pub status: TrafficStatus,
    pub traffic_ratio: f64,
    pub estimated_arrival: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct RouteStepResponse {
    pub instruction: String,
    pub distance: String,
    pub duration: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StationResponse {
    pub name: String,
    pub vicinity: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TripErrorResponse {
    pub error_code: TripErrorCode,
    pub error_message: String,
    pub timestamp: String,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TripErrorCode {
    ValidationError,
    UpstreamError,
    InternalError,
}

#[derive(Debug, Serialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Ok,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub model: String,
    pub timestamp: String,
}
