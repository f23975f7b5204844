//! open-elevation API client.

use crate::trip::{ElevationService, GeoPoint, TripError};
use serde::Deserialize;

pub const DEFAULT_BASE_URL: &str = "https://api.open-elevation.com";

#[derive(Debug, Clone)]
pub struct OpenElevationClient {
    client: reqwest::Client,
    base_url: String,
}

impl OpenElevationClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self::with_base_url(client, DEFAULT_BASE_URL.to_string())
    }

    pub fn with_base_url(client: reqwest::Client, base_url: String) -> Self {
        Self { client, base_url }
    }
}

impl ElevationService for OpenElevationClient {
    async fn elevation_m(&self, point: GeoPoint) -> Result<f64, TripError> {
        let url = format!("{}/api/v1/lookup", self.base_url);
        let response: LookupResponse = self
            .client
            .get(&url)
            .query(&[("locations", format!("{},{}", point.lat, point.lon))])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response
            .results
            .first()
            .map(|result| result.elevation)
            .ok_or(TripError::MissingData {
                api: "open-elevation",
                field: "results[0].elevation",
            })
    }
}

#[derive(Debug, Deserialize)]
struct LookupResponse {
    #[serde(default)]
    results: Vec<LookupResult>,
}

#[derive(Debug, Deserialize)]
struct LookupResult {
    elevation: f64,
}
