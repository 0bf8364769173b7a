//! Route table.

mod appointments;
mod auth;
mod dashboard;
mod health;
mod patients;
mod payments;
mod reports;
mod treatments;

use axum::Router;
use serde::Serialize;

use dental_clinic_core::ClinicError;

use crate::{ApiError, AppState};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(patients::routes())
        .merge(treatments::routes())
        .merge(payments::routes())
        .merge(appointments::routes())
        .merge(dashboard::routes())
        .merge(reports::routes())
        .fallback(|| async { ApiError::from(ClinicError::RouteNotFound) })
}

/// Body of update and delete responses.
#[derive(Debug, Serialize)]
pub(crate) struct Message {
    pub message: String,
}

impl From<String> for Message {
    fn from(message: String) -> Self {
        Self { message }
    }
}

/// Integer row ids arrive as path text; anything unparsable cannot exist.
pub(crate) fn row_id(raw: &str, not_found: &str) -> Result<i64, ApiError> {
    raw.parse()
        .map_err(|_| ClinicError::NotFound(not_found.to_string()).into())
}
