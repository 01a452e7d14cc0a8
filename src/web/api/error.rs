use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::predict::PredictError;

pub enum ApiError {
    Predict(PredictError),
    Internal(String),
}

impl From<PredictError> for ApiError {
    fn from(e: PredictError) -> Self {
        ApiError::Predict(e)
    }
}

impl ApiError {
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ApiError::Predict(PredictError::InvalidConfiguration(_)) => {
                (StatusCode::BAD_REQUEST, "invalid_configuration")
            }
            ApiError::Predict(PredictError::NoPassFound { .. }) => {
                (StatusCode::NOT_FOUND, "no_pass_found")
            }
            ApiError::Predict(PredictError::PropagationOutOfRange { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "propagation_out_of_range")
            }
            ApiError::Predict(_) => (StatusCode::INTERNAL_SERVER_ERROR, "prediction_failed"),
            ApiError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();
        let message = match &self {
            ApiError::Predict(e) => e.to_string(),
            ApiError::Internal(msg) => msg.clone(),
        };
        if status.is_server_error() {
            log::error!("{}: {}", code, message);
        }
        (status, Json(ErrorResponse::with_message(code, &message))).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn with_message(error: &str, message: &str) -> Self {
        ErrorResponse {
            error: error.to_string(),
            message: Some(message.to_string()),
        }
    }
}
