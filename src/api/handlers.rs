use crate::api::responses::{
    HealthResponse, HealthStatus, PlaceResponse, RouteStepResponse, StationResponse,
    TrafficSegmentResponse, TripErrorCode, TripErrorResponse, TripSuccessResponse,
};
use crate::error::AppError;
use crate::planner::{self, PlaceReport, TripEvaluation, TripRequest};
use crate::state::AppContext;
use crate::trip::ChargingStation;
use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use std::sync::Arc;
use std::time::{Duration, SystemTime};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::error;

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

pub enum TripResponse {
    Success(Box<TripSuccessResponse>),
    Error {
        status: StatusCode,
        body: TripErrorResponse,
    },
}

impl IntoResponse for TripResponse {
    fn into_response(self) -> Response {
        match self {
            TripResponse::Success(body) => (StatusCode::OK, Json(body)).into_response(),
            TripResponse::Error { status, body } => (status, Json(body)).into_response(),
        }
    }
}

pub async fn post_trip(
    State(context): State<Arc<AppContext>>,
    Json(request): Json<TripRequest>,
) -> impl IntoResponse {
    let result = planner::evaluate_trip(
        &context.google,
        &context.elevation,
        &context.google,
        &context.google,
        context.model.as_ref(),
        &request,
        context.station_radius_m,
    )
    .await;

    build_trip_response(result, SystemTime::now())
}

pub async fn get_health(State(context): State<Arc<AppContext>>) -> impl IntoResponse {
    let timestamp = format_timestamp(SystemTime::now()).unwrap_or_else(fallback_timestamp);
    (
        StatusCode::OK,
        Json(HealthResponse {
            status: HealthStatus::Ok,
            model: context.model.kind().to_string(),
            timestamp,
        }),
    )
}

fn build_trip_response(result: Result<TripEvaluation, AppError>, now: SystemTime) -> TripResponse {
    let evaluation = match result {
        Ok(evaluation) => evaluation,
        Err(AppError::Validation(err)) => {
            return error_response(
                StatusCode::BAD_REQUEST,
                TripErrorCode::ValidationError,
                err.to_string(),
            );
        }
        Err(AppError::Trip(err)) => {
            error!(error = %err, "Upstream trip data failure");
            return error_response(
                StatusCode::BAD_GATEWAY,
                TripErrorCode::UpstreamError,
                err.to_string(),
            );
        }
        Err(AppError::Model(err)) => {
            error!(error = %err, "Model failure while evaluating trip");
            return internal_error();
        }
    };

    let timestamp = match format_timestamp(now) {
        Ok(formatted) => formatted,
        Err(_) => return internal_error(),
    };

    let traffic = evaluation
        .traffic
        .iter()
        .map(|segment| TrafficSegmentResponse {
            segment: segment.segment,
            status: segment.status,
            traffic_ratio: segment.traffic_ratio,
            estimated_arrival: format_timestamp(now + Duration::from_secs(segment.eta_secs))
                .unwrap_or_else(fallback_timestamp),
        })
        .collect();

    TripResponse::Success(Box::new(TripSuccessResponse {
        source: place_response(&evaluation.source),
        destination: place_response(&evaluation.destination),
        elevation_change_m: evaluation.elevation_change_m,
        distance_km: evaluation.distance_km,
        duration_secs: evaluation.duration_secs,
        average_speed_kmh: evaluation.average_speed_kmh,
        predicted_range_km: evaluation.predicted_range_km,
        recommendation: evaluation.recommendation,
        traffic,
        steps: evaluation
            .steps
            .iter()
            .map(|step| RouteStepResponse {
                instruction: step.instruction.clone(),
                distance: step.distance_text.clone(),
                duration: step.duration_text.clone(),
            })
            .collect(),
        stations: evaluation.stations.iter().map(station_response).collect(),
        best_station: evaluation.best_station.as_ref().map(station_response),
        timestamp,
    }))
}

fn place_response(place: &PlaceReport) -> PlaceResponse {
    PlaceResponse {
        display_name: place.display_name.clone(),
        lat: place.lat,
        lon: place.lon,
        elevation_m: place.elevation_m,
    }
}

fn station_response(station: &ChargingStation) -> StationResponse {
    StationResponse {
        name: station.name.clone(),
        vicinity: station.vicinity.clone(),
        lat: station.lat,
        lon: station.lon,
    }
}

fn error_response(status: StatusCode, code: TripErrorCode, message: String) -> TripResponse {
    TripResponse::Error {
        status,
        body: TripErrorResponse {
            error_code: code,
            error_message: message,
            timestamp: format_timestamp(SystemTime::now()).unwrap_or_else(fallback_timestamp),
        },
    }
}

fn internal_error() -> TripResponse {
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        TripErrorCode::InternalError,
        INTERNAL_ERROR_MESSAGE.to_string(),
    )
}

fn format_timestamp(timestamp: SystemTime) -> Result<String, time::error::Format> {
    OffsetDateTime::from(timestamp).format(&Rfc3339)
}

fn fallback_timestamp(err: time::error::Format) -> String {
    error!(error = %err, "Failed to format response timestamp");
    "1970-01-01T00:00:00Z".to_string()
}
