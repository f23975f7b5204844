use crate::features::ValidationError;
use crate::model::ModelError;
use crate::trip::TripError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid trip input: {0}")]
    Validation(#[from] ValidationError),
    #[error("range model unavailable: {0}")]
    Model(#[from] ModelError),
    #[error("trip data error: {0}")]
    Trip(#[from] TripError),
}
