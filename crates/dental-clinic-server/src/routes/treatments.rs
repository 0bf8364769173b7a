//! Treatment visit endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use dental_clinic_core::{Created, Treatment, TreatmentInput};

use super::{row_id, Message};
use crate::{ApiResult, AppState, Operator};

const NOT_FOUND: &str = "Treatment not found";

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/treatments", get(list).post(create))
        .route("/api/treatments/patient/:patient_id", get(for_patient))
        .route("/api/treatments/:id", get(fetch).put(update).delete(remove))
}

async fn list(_: Operator, State(state): State<AppState>) -> ApiResult<Json<Vec<Treatment>>> {
    Ok(Json(state.run(|core| core.list_treatments()).await?))
}

async fn for_patient(
    _: Operator,
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<Treatment>>> {
    let rows = state
        .run(move |core| core.list_treatments_for_patient(&patient_id))
        .await?;
    Ok(Json(rows))
}

async fn fetch(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Treatment>> {
    let id = row_id(&id, NOT_FOUND)?;
    Ok(Json(state.run(move |core| core.get_treatment(id)).await?))
}

async fn create(
    _: Operator,
    State(state): State<AppState>,
    payload: Result<Json<TreatmentInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let Json(input) = payload?;
    let created = state.run(move |core| core.create_treatment(&input)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<TreatmentInput>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let id = row_id(&id, NOT_FOUND)?;
    let Json(input) = payload?;
    let message = state
        .run(move |core| core.update_treatment(id, &input))
        .await?;
    Ok(Json(message.into()))
}

async fn remove(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = row_id(&id, NOT_FOUND)?;
    let message = state.run(move |core| core.delete_treatment(id)).await?;
    Ok(Json(message.into()))
}
