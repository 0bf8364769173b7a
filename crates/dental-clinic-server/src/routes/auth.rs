//! Login and token verification.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use dental_clinic_core::{LoginResponse, VerifyResponse};

use crate::{ApiResult, AppState, Operator};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct LoginRequest {
    username: String,
    password: String,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/verify", get(verify))
}

async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ApiResult<Json<LoginResponse>> {
    let Json(request) = payload?;
    let response = state
        .run(move |core| core.login(&request.username, &request.password))
        .await?;
    Ok(Json(response))
}

async fn verify(Operator(claims): Operator) -> Json<VerifyResponse> {
    Json(VerifyResponse {
        valid: true,
        user: claims,
    })
}
