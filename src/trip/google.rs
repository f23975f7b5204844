//! Google Maps API client: geocoding, directions, distance-matrix traffic
//! and charging-station nearby search.

use crate::trip::{
    ChargingStation, GeoPoint, GeocodedPlace, Geocoder, RouteStep, RouteSummary, RoutingService,
    SegmentTraffic, StationLocator, TripError, classify_traffic,
};
use serde::Deserialize;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com";

#[derive(Clone)]
pub struct GoogleMapsClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for GoogleMapsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GoogleMapsClient")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl GoogleMapsClient {
    pub fn new(client: reqwest::Client, api_key: String) -> Self {
        Self::with_base_url(client, api_key, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        Self {
            client,
            api_key,
            base_url,
        }
    }

    async fn geocode_once(&self, place: &str) -> Result<Option<GeocodedPlace>, TripError> {
        let url = format!("{}/maps/api/geocode/json", self.base_url);
        let response: GeocodeResponse = self
            .client
            .get(&url)
            .query(&[("address", place), ("key", self.api_key.as_str())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status == "ZERO_RESULTS" || response.results.is_empty() {
            return Ok(None);
        }
        if response.status != "OK" {
            return Err(TripError::Vendor {
                api: "geocode",
                status: response.status,
            });
        }

        let result = &response.results[0];
        Ok(Some(GeocodedPlace {
            display_name: result.formatted_address.clone(),
            lat: result.geometry.location.lat,
            lon: result.geometry.location.lng,
        }))
    }
}

impl Geocoder for GoogleMapsClient {
    /// Geocode a place name, retrying once with the text before the first
    /// comma when the full query matches nothing.
    async fn geocode(&self, place: &str) -> Result<GeocodedPlace, TripError> {
        if let Some(found) = self.geocode_once(place).await? {
            return Ok(found);
        }

        if let Some((prefix, _)) = place.split_once(',') {
            debug!(place, prefix, "Geocode returned no results, retrying with prefix");
            if let Some(found) = self.geocode_once(prefix.trim()).await? {
                return Ok(found);
            }
        }

        Err(TripError::NoResults {
            api: "geocode",
            query: place.to_string(),
        })
    }
}

impl RoutingService for GoogleMapsClient {
    async fn route(
        &self,
        origin: GeoPoint,
        destination: GeoPoint,
    ) -> Result<RouteSummary, TripError> {
        let url = format!("{}/maps/api/directions/json", self.base_url);
        let response: DirectionsResponse = self
            .client
            .get(&url)
            .query(&[
                ("origin", format!("{},{}", origin.lat, origin.lon)),
                (
                    "destination",
                    format!("{},{}", destination.lat, destination.lon),
                ),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status != "OK" {
            return Err(TripError::Vendor {
                api: "directions",
                status: response.status,
            });
        }

        let leg = response
            .routes
            .first()
            .and_then(|route| route.legs.first())
            .ok_or(TripError::MissingData {
                api: "directions",
                field: "routes[0].legs[0]",
            })?;

        let mut steps = Vec::with_capacity(leg.steps.len());
        let mut waypoints = Vec::with_capacity(leg.steps.len() + 1);
        for step in &leg.steps {
            steps.push(RouteStep {
                instruction: step.html_instructions.clone(),
                distance_text: step.distance.text.clone(),
                duration_text: step.duration.text.clone(),
            });
            waypoints.push(GeoPoint {
                lat: step.start_location.lat,
                lon: step.start_location.lng,
            });
        }
        if let Some(last) = leg.steps.last() {
            waypoints.push(GeoPoint {
                lat: last.end_location.lat,
                lon: last.end_location.lng,
            });
        }

        Ok(RouteSummary {
            distance_km: leg.distance.value as f64 / 1000.0,
            duration_secs: leg.duration.value,
            steps,
            waypoints,
        })
    }

    async fn segment_traffic(
        &self,
        waypoints: &[GeoPoint],
    ) -> Result<Vec<SegmentTraffic>, TripError> {
        let url = format!("{}/maps/api/distancematrix/json", self.base_url);
        let mut updates = Vec::new();
        let mut elapsed_secs = 0u64;

        for (index, pair) in waypoints.windows(2).enumerate() {
            let response: DistanceMatrixResponse = self
                .client
                .get(&url)
                .query(&[
                    ("origins", format!("{},{}", pair[0].lat, pair[0].lon)),
                    ("destinations", format!("{},{}", pair[1].lat, pair[1].lon)),
                    ("departure_time", "now".to_string()),
                    ("key", self.api_key.clone()),
                ])
                .send()
                .await?
                .error_for_status()?
                .json()
                .await?;

            if response.status != "OK" {
                return Err(TripError::Vendor {
                    api: "distancematrix",
                    status: response.status,
                });
            }

            let element = response
                .rows
                .first()
                .and_then(|row| row.elements.first())
                .ok_or(TripError::MissingData {
                    api: "distancematrix",
                    field: "rows[0].elements[0]",
                })?;

            let normal_secs = element.duration.value.max(1);
            // Traffic-aware duration is absent on some matrix elements; treat
            // those segments as free-flow.
            let in_traffic_secs = element
                .duration_in_traffic
                .as_ref()
                .map(|d| d.value)
                .unwrap_or(normal_secs);
            let traffic_ratio = in_traffic_secs as f64 / normal_secs as f64;
            elapsed_secs += in_traffic_secs;

            updates.push(SegmentTraffic {
                segment: index + 1,
                status: classify_traffic(traffic_ratio),
                traffic_ratio,
                eta_secs: elapsed_secs,
            });
        }

        Ok(updates)
    }
}

impl StationLocator for GoogleMapsClient {
    async fn stations_near(
        &self,
        point: GeoPoint,
        radius_m: u32,
    ) -> Result<Vec<ChargingStation>, TripError> {
        let url = format!("{}/maps/api/place/nearbysearch/json", self.base_url);
        let response: PlacesResponse = self
            .client
            .get(&url)
            .query(&[
                ("location", format!("{},{}", point.lat, point.lon)),
                ("radius", radius_m.to_string()),
                ("type", "charging_station".to_string()),
                ("key", self.api_key.clone()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if response.status == "ZERO_RESULTS" {
            return Ok(Vec::new());
        }
        if response.status != "OK" {
            return Err(TripError::Vendor {
                api: "places",
                status: response.status,
            });
        }

        Ok(response
            .results
            .into_iter()
            .map(|place| ChargingStation {
                name: place.name,
                vicinity: place.vicinity.unwrap_or_default(),
                lat: place.geometry.location.lat,
                lon: place.geometry.location.lng,
            })
            .collect())
    }
}

// Vendor wire formats.

#[derive(Debug, Deserialize)]
struct GeocodeResponse {
    status: String,
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Debug, Deserialize)]
struct GeocodeResult {
    formatted_address: String,
    geometry: Geometry,
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: LatLng,
}

#[derive(Debug, Deserialize)]
struct LatLng {
    lat: f64,
    lng: f64,
}

#[derive(Debug, Deserialize)]
struct DirectionsResponse {
    status: String,
    #[serde(default)]
    routes: Vec<DirectionsRoute>,
}

#[derive(Debug, Deserialize)]
struct DirectionsRoute {
    legs: Vec<DirectionsLeg>,
}

#[derive(Debug, Deserialize)]
struct DirectionsLeg {
    distance: TextValue,
    duration: TextValue,
    steps: Vec<DirectionsStep>,
}

#[derive(Debug, Deserialize)]
struct DirectionsStep {
    html_instructions: String,
    distance: TextValue,
    duration: TextValue,
    start_location: LatLng,
    end_location: LatLng,
}

#[derive(Debug, Deserialize)]
struct TextValue {
    text: String,
    value: u64,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixResponse {
    status: String,
    #[serde(default)]
    rows: Vec<DistanceMatrixRow>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixRow {
    elements: Vec<DistanceMatrixElement>,
}

#[derive(Debug, Deserialize)]
struct DistanceMatrixElement {
    duration: ValueOnly,
    duration_in_traffic: Option<ValueOnly>,
}

#[derive(Debug, Deserialize)]
struct ValueOnly {
    value: u64,
}

#[derive(Debug, Deserialize)]
struct PlacesResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    name: String,
    vicinity: Option<String>,
    geometry: Geometry,
}
