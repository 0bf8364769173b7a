//! Bearer token extractor.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use dental_clinic_core::Claims;

use crate::{ApiError, AppState};

/// The authenticated operator behind a request.
///
/// Rejects with 401 when the header is missing and 403 when the token does
/// not verify.
#[derive(Debug, Clone)]
pub struct Operator(pub Claims);

#[async_trait]
impl FromRequestParts<AppState> for Operator {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        let claims = state.core().authorize(header)?;
        Ok(Operator(claims))
    }
}
