//! Shared application context: the loaded model and the HTTP collaborators.
//!
//! Everything here is immutable after startup, so the context is shared as a
//! plain `Arc` with no locking.

use crate::model::RangeModel;
use crate::trip::elevation::OpenElevationClient;
use crate::trip::google::GoogleMapsClient;
use std::sync::Arc;

#[derive(Debug)]
pub struct AppContext {
    pub model: Arc<dyn RangeModel>,
    pub google: GoogleMapsClient,
    pub elevation: OpenElevationClient,
    pub station_radius_m: u32,
}

impl AppContext {
    pub fn new(
        model: Arc<dyn RangeModel>,
        google: GoogleMapsClient,
        elevation: OpenElevationClient,
        station_radius_m: u32,
    ) -> Self {
        Self {
            model,
            google,
            elevation,
            station_radius_m,
        }
    }
}
