//! Trip evaluation pipeline: geocode, elevation, route and traffic, range
//! prediction, charging recommendation, station search.
//!
//! Collaborators are injected as trait bounds and the model as an immutable
//! handle, so the whole pipeline runs unchanged against mocks.

use crate::advisor::{self, ChargingRecommendation};
use crate::error::AppError;
use crate::features::{RawTripInputs, TrafficStatus, TripFeatures};
use crate::model::RangeModel;
use crate::trip::{
    ChargingStation, ElevationService, GeoPoint, GeocodedPlace, Geocoder, RouteStep,
    RoutingService, SegmentTraffic, StationLocator, stations_along_route,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Fallback cruise speed when the route duration is unusable.
const DEFAULT_SPEED_KMH: f64 = 60.0;

/// Assumed post-charge state when scoring candidate stations.
const STATION_CHARGE_TARGET_PCT: f64 = 80.0;

#[derive(Debug, Clone, Deserialize)]
pub struct TripRequest {
    pub source: String,
    pub destination: String,
    pub soc_percent: f64,
    pub battery_capacity_kwh: f64,
    pub battery_temp_c: f64,
    pub wind_speed_kmh: f64,
    pub ac_usage: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlaceReport {
    pub display_name: String,
    pub lat: f64,
    pub lon: f64,
    pub elevation_m: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct TripEvaluation {
    pub source: PlaceReport,
    pub destination: PlaceReport,
    pub elevation_change_m: f64,
    pub distance_km: f64,
    pub duration_secs: u64,
    pub average_speed_kmh: f64,
    pub traffic: Vec<SegmentTraffic>,
    pub steps: Vec<RouteStep>,
    pub predicted_range_km: f64,
    pub recommendation: ChargingRecommendation,
    pub stations: Vec<ChargingStation>,
    pub best_station: Option<ChargingStation>,
}

/// Evaluate a trip end to end and produce a range prediction plus charging
/// recommendation.
pub async fn evaluate_trip<G, E, R, S>(
    geocoder: &G,
    elevation: &E,
    routing: &R,
    stations: &S,
    model: &dyn RangeModel,
    request: &TripRequest,
    station_radius_m: u32,
) -> Result<TripEvaluation, AppError>
where
    G: Geocoder,
    E: ElevationService,
    R: RoutingService,
    S: StationLocator,
{
    let source = geocoder.geocode(&request.source).await?;
    let destination = geocoder.geocode(&request.destination).await?;

    let source_elevation = elevation.elevation_m(source.point()).await?;
    let destination_elevation = elevation.elevation_m(destination.point()).await?;
    let elevation_change_m = destination_elevation - source_elevation;

    let route = routing.route(source.point(), destination.point()).await?;
    let traffic = routing.segment_traffic(&route.waypoints).await?;
    // The first segment reflects conditions at departure; an empty traffic
    // report means no congestion data, treated as free flow.
    let traffic_status = traffic
        .first()
        .map(|segment| segment.status)
        .unwrap_or(TrafficStatus::Light);

    let average_speed_kmh = average_speed(route.distance_km, route.duration_secs);

    let features = TripFeatures::assemble(RawTripInputs {
        battery_temp_c: request.battery_temp_c,
        current_charging_pct: request.soc_percent,
        soc_pct: request.soc_percent,
        battery_capacity_kwh: request.battery_capacity_kwh,
        elevation_change_m,
        traffic_status,
        speed_kmh: average_speed_kmh,
        wind_speed_kmh: request.wind_speed_kmh,
        ac_usage: request.ac_usage,
    })?;

    let predicted_range_km = model.predict(&features);
    let recommendation = advisor::recommend(request.soc_percent, predicted_range_km, route.distance_km);
    debug!(
        predicted_range_km,
        distance_km = route.distance_km,
        ?recommendation,
        "Trip evaluated"
    );

    let found = stations_along_route(stations, &route.waypoints, station_radius_m).await;
    let best_station = best_charging_station(
        routing,
        model,
        request,
        &found,
        source.point(),
        destination.point(),
    )
    .await;

    Ok(TripEvaluation {
        source: place_report(&source, source_elevation),
        destination: place_report(&destination, destination_elevation),
        elevation_change_m,
        distance_km: route.distance_km,
        duration_secs: route.duration_secs,
        average_speed_kmh,
        traffic,
        steps: route.steps,
        predicted_range_km,
        recommendation,
        stations: found,
        best_station,
    })
}

fn place_report(place: &GeocodedPlace, elevation_m: f64) -> PlaceReport {
    PlaceReport {
        display_name: place.display_name.clone(),
        lat: place.lat,
        lon: place.lon,
        elevation_m,
    }
}

fn average_speed(distance_km: f64, duration_secs: u64) -> f64 {
    if duration_secs == 0 {
        return DEFAULT_SPEED_KMH;
    }
    distance_km / (duration_secs as f64 / 3600.0)
}

/// Score candidate stations by post-charge range minus total detour distance
/// and return the best one. Stations whose detour cannot be routed are
/// skipped.
async fn best_charging_station<R: RoutingService>(
    routing: &R,
    model: &dyn RangeModel,
    request: &TripRequest,
    candidates: &[ChargingStation],
    current: GeoPoint,
    destination: GeoPoint,
) -> Option<ChargingStation> {
    let mut best: Option<(f64, &ChargingStation)> = None;
    let post_charge = post_charge_features(request);
    let range_after_charge = model.predict(&post_charge);

    for station in candidates {
        let to_station = match routing.route(current, station.point()).await {
            Ok(route) => route.distance_km,
            Err(err) => {
                warn!(station = %station.name, error = %err, "Skipping station, detour unroutable");
                continue;
            }
        };
        let onward = match routing.route(station.point(), destination).await {
            Ok(route) => route.distance_km,
            Err(err) => {
                warn!(station = %station.name, error = %err, "Skipping station, onward leg unroutable");
                continue;
            }
        };

        let score = range_after_charge - (to_station + onward);

        if best.is_none_or(|(current_best, _)| score > current_best) {
            best = Some((score, station));
        }
    }

    best.map(|(_, station)| station.clone())
}

/// Feature record for the vehicle once charged at a station: target charge
/// level, flat terrain and a nominal cruise under moderate traffic.
fn post_charge_features(request: &TripRequest) -> TripFeatures {
    TripFeatures {
        battery_temp_c: request.battery_temp_c,
        current_charging_pct: STATION_CHARGE_TARGET_PCT,
        soc_pct: STATION_CHARGE_TARGET_PCT,
        battery_capacity_kwh: request.battery_capacity_kwh,
        elevation_change_m: 0.0,
        traffic_status: TrafficStatus::Moderate,
        speed_kmh: DEFAULT_SPEED_KMH,
        wind_speed_kmh: request.wind_speed_kmh,
        ac_usage: request.ac_usage,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn average_speed_from_distance_and_duration() {
        assert_eq!(average_speed(120.0, 7200), 60.0);
    }

    #[test]
    fn zero_duration_falls_back_to_default_speed() {
        assert_eq!(average_speed(120.0, 0), DEFAULT_SPEED_KMH);
    }

    #[test]
    fn post_charge_features_assume_target_charge() {
        let request = TripRequest {
            source: "A".to_string(),
            destination: "B".to_string(),
            soc_percent: 30.0,
            battery_capacity_kwh: 70.0,
            battery_temp_c: 22.0,
            wind_speed_kmh: 8.0,
            ac_usage: true,
        };

        let features = post_charge_features(&request);
        assert_eq!(features.soc_pct, STATION_CHARGE_TARGET_PCT);
        assert_eq!(features.current_charging_pct, STATION_CHARGE_TARGET_PCT);
        assert_eq!(features.elevation_change_m, 0.0);
        assert_eq!(features.traffic_status, TrafficStatus::Moderate);
        assert_eq!(features.battery_capacity_kwh, 70.0);
    }
}
