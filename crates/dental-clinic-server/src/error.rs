//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use dental_clinic_core::{AuthorizationError, ClinicError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Clinic(#[from] ClinicError),

    /// Request body or query string could not be decoded.
    #[error("{0}")]
    BadRequest(String),

    #[error("Something went wrong!")]
    Internal,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Clinic(err) => match err {
                ClinicError::Validation(_) => StatusCode::BAD_REQUEST,
                ClinicError::Authentication(_) => StatusCode::UNAUTHORIZED,
                ClinicError::Authorization(AuthorizationError::MissingToken) => {
                    StatusCode::UNAUTHORIZED
                }
                ClinicError::Authorization(AuthorizationError::InvalidToken) => {
                    StatusCode::FORBIDDEN
                }
                ClinicError::NotFound(_) | ClinicError::RouteNotFound => StatusCode::NOT_FOUND,
                ClinicError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Log an unexpected failure and hide its detail from the caller.
    pub fn internal(err: impl std::fmt::Display) -> Self {
        error!(error = %err, "request failed");
        ApiError::Internal
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.to_string() }));
        (self.status(), body).into_response()
    }
}
