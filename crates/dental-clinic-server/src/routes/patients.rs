//! Patient endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use dental_clinic_core::{Created, Patient, PatientInput};

use super::Message;
use crate::{ApiResult, AppState, Operator};

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/patients", get(list).post(create))
        .route("/api/patients/search/:query", get(search))
        .route("/api/patients/:id", get(fetch).put(update).delete(remove))
}

async fn list(_: Operator, State(state): State<AppState>) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(state.run(|core| core.list_patients()).await?))
}

async fn fetch(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Patient>> {
    Ok(Json(state.run(move |core| core.get_patient(&id)).await?))
}

async fn search(
    _: Operator,
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> ApiResult<Json<Vec<Patient>>> {
    Ok(Json(state.run(move |core| core.search_patients(&query)).await?))
}

async fn create(
    _: Operator,
    State(state): State<AppState>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let Json(input) = payload?;
    let created = state.run(move |core| core.create_patient(&input)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PatientInput>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let Json(input) = payload?;
    let message = state
        .run(move |core| core.update_patient(&id, &input))
        .await?;
    Ok(Json(message.into()))
}

async fn remove(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let message = state.run(move |core| core.delete_patient(&id)).await?;
    Ok(Json(message.into()))
}
