//! Deterministic in-memory collaborators for tests.

use crate::trip::{
    ChargingStation, ElevationService, GeoPoint, GeocodedPlace, Geocoder, RouteSummary,
    RoutingService, SegmentTraffic, StationLocator, TripError, classify_traffic,
};

const COORD_EPSILON: f64 = 1e-6;

fn same_point(a: GeoPoint, b: GeoPoint) -> bool {
    (a.lat - b.lat).abs() < COORD_EPSILON && (a.lon - b.lon).abs() < COORD_EPSILON
}

pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6_371.0;
    let (lat1, lon1, lat2, lon2) = (
        a.lat.to_radians(),
        a.lon.to_radians(),
        b.lat.to_radians(),
        b.lon.to_radians(),
    );
    let dlat = lat2 - lat1;
    let dlon = lon2 - lon1;
    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[derive(Debug, Default)]
pub struct MockGeocoder {
    places: Vec<(String, GeocodedPlace)>,
}

impl MockGeocoder {
    pub fn with_places(places: Vec<(String, GeocodedPlace)>) -> Self {
        Self { places }
    }
}

impl Geocoder for MockGeocoder {
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, TripError> {
        self.places
            .iter()
            .find(|(name, _)| name == place)
            .map(|(_, found)| found.clone())
            .ok_or_else(|| TripError::NoResults {
                api: "mock-geocode",
                query: place.to_string(),
            })
    }
}

#[derive(Debug)]
pub struct MockElevationService {
    elevations: Vec<(GeoPoint, f64)>,
    default_m: Option<f64>,
}

impl MockElevationService {
    pub fn with_elevations(elevations: Vec<(GeoPoint, f64)>) -> Self {
        Self {
            elevations,
            default_m: None,
        }
    }

    /// Every point resolves to the same elevation.
    pub fn flat(elevation_m: f64) -> Self {
        Self {
            elevations: Vec::new(),
            default_m: Some(elevation_m),
        }
    }
}

impl ElevationService for MockElevationService {
    async fn elevation_m(&self, point: GeoPoint) -> Result<f64, TripError> {
        self.elevations
            .iter()
            .find(|(known, _)| same_point(*known, point))
            .map(|(_, elevation)| *elevation)
            .or(self.default_m)
            .ok_or(TripError::MissingData {
                api: "mock-elevation",
                field: "results[0].elevation",
            })
    }
}

/// Routing mock: great-circle distance at a fixed cruise speed, with
/// configurable per-segment traffic ratios.
#[derive(Debug)]
pub struct MockRoutingService {
    pub speed_kmh: f64,
    pub segment_ratios: Vec<f64>,
}

impl Default for MockRoutingService {
    fn default() -> Self {
        Self {
            speed_kmh: 60.0,
            segment_ratios: Vec::new(),
        }
    }
}

impl MockRoutingService {
    pub fn with_segment_ratios(segment_ratios: Vec<f64>) -> Self {
        Self {
            speed_kmh: 60.0,
            segment_ratios,
        }
    }
}

impl RoutingService for MockRoutingService {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<RouteSummary, TripError> {
        let distance_km = haversine_km(origin, destination);
        let duration_secs = (distance_km / self.speed_kmh * 3600.0).round() as u64;
        Ok(RouteSummary {
            distance_km,
            duration_secs,
            steps: Vec::new(),
            waypoints: vec![origin, destination],
        })
    }

    async fn segment_traffic(
        &self,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<SegmentTraffic>, TripError> {
        let mut elapsed_secs = 0u64;
        let mut updates = Vec::new();
        for (index, pair) in waypoints.windows(2).enumerate() {
            let ratio = self
                .segment_ratios
                .get(index)
                .copied()
                .unwrap_or(1.0);
            let nominal_secs =
                (haversine_km(pair[0], pair[1]) / self.speed_kmh * 3600.0).round() as u64;
            elapsed_secs += (nominal_secs as f64 * ratio).round() as u64;
            updates.push(SegmentTraffic {
                segment: index + 1,
                status: classify_traffic(ratio),
                traffic_ratio: ratio,
                eta_secs: elapsed_secs,
            });
        }
        Ok(updates)
    }
}

#[derive(Debug, Default)]
pub struct MockStationLocator {
    stations: Vec<ChargingStation>,
}

impl MockStationLocator {
    pub fn with_stations(stations: Vec<ChargingStation>) -> Self {
        Self { stations }
    }
}

impl StationLocator for MockStationLocator {
    async fn stations_near(
        &self,
        _point: GeoPoint,
        _radius_m: u32,
    ) -> Result<Vec<ChargingStation>, TripError> {
        Ok(self.stations.clone())
    }
}
