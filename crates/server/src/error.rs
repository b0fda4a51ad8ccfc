//! HTTP error mapping

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use forecast_facade::ForecastError;
use serde_json::json;

/// Error returned by handlers, rendered as `{"error": message}`.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Missing, empty or malformed input
    BadRequest(String),
    /// Model or dataset unavailable, or nothing could be predicted
    Unavailable(String),
    /// Anything unexpected
    Internal(String),
}

impl ApiError {
    pub fn no_data() -> Self {
        ApiError::BadRequest("No data provided".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(m) | ApiError::Unavailable(m) | ApiError::Internal(m) => m,
        }
    }
}

impl From<ForecastError> for ApiError {
    fn from(error: ForecastError) -> Self {
        if !error.is_unavailable() {
            tracing::warn!("Rejected request: {}", error);
            return ApiError::BadRequest(error.to_string());
        }

        tracing::error!("Request failed: {}", error);
        let message = match error {
            ForecastError::ModelUnavailable(_) => "Model not available",
            ForecastError::DatasetUnavailable(_) | ForecastError::Data(_) => {
                "Dataset not available"
            }
            ForecastError::ForecastFailed(_) => "Forecast generation failed",
            _ => "Prediction failed",
        };
        ApiError::Unavailable(message.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
