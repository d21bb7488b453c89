use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use seatwise_core::{AllocationError, AvailabilityError, CoreError, SubmissionError};
use serde_json::json;
use crate::sessions::SessionError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    NotFoundError(String),
    ConflictError(String),
    UnprocessableError(String),
    UpstreamError(String),
    InternalServerError(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFoundError(msg) => (StatusCode::NOT_FOUND, msg),
            AppError::ConflictError(msg) => (StatusCode::CONFLICT, msg),
            AppError::UnprocessableError(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg),
            AppError::UpstreamError(msg) => {
                tracing::warn!("Upstream failure: {}", msg);
                (StatusCode::BAD_GATEWAY, msg)
            },
            AppError::InternalServerError(msg) => {
                tracing::error!("Internal Server Error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error".to_string())
            },
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<AllocationError> for AppError {
    fn from(err: AllocationError) -> Self {
        match err {
            AllocationError::AllPassengersAssigned | AllocationError::SeatUnavailable(_) => {
                AppError::ConflictError(err.to_string())
            }
            AllocationError::IncompleteAssignment { .. } => AppError::UnprocessableError(err.to_string()),
            AllocationError::UnknownSeat(_) => AppError::NotFoundError(err.to_string()),
            AllocationError::NoPassengers => AppError::ValidationError(err.to_string()),
        }
    }
}

impl From<AvailabilityError> for AppError {
    fn from(err: AvailabilityError) -> Self {
        match err {
            AvailabilityError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            AvailabilityError::Unreachable(_) | AvailabilityError::Malformed(_) => {
                AppError::UpstreamError(err.to_string())
            }
        }
    }
}

impl From<SubmissionError> for AppError {
    fn from(err: SubmissionError) -> Self {
        match err {
            SubmissionError::Encoding(e) => AppError::InternalServerError(e.to_string()),
            SubmissionError::Rejected(_) => AppError::UpstreamError(err.to_string()),
        }
    }
}

impl From<CoreError> for AppError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Allocation(e) => e.into(),
            CoreError::Availability(e) => e.into(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound(_) => AppError::NotFoundError(err.to_string()),
            SessionError::Submitting(_) => AppError::ConflictError(err.to_string()),
        }
    }
}
