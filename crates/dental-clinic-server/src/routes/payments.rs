//! Payment endpoints.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use dental_clinic_core::{Created, Payment, PaymentInput};

use super::{row_id, Message};
use crate::{ApiResult, AppState, Operator};

const NOT_FOUND: &str = "Payment not found";

pub(super) fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/payments", get(list).post(create))
        .route("/api/payments/patient/:patient_id", get(for_patient))
        .route("/api/payments/:id", get(fetch).put(update).delete(remove))
}

async fn list(_: Operator, State(state): State<AppState>) -> ApiResult<Json<Vec<Payment>>> {
    Ok(Json(state.run(|core| core.list_payments()).await?))
}

async fn for_patient(
    _: Operator,
    State(state): State<AppState>,
    Path(patient_id): Path<String>,
) -> ApiResult<Json<Vec<Payment>>> {
    let rows = state
        .run(move |core| core.list_payments_for_patient(&patient_id))
        .await?;
    Ok(Json(rows))
}

async fn fetch(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Payment>> {
    let id = row_id(&id, NOT_FOUND)?;
    Ok(Json(state.run(move |core| core.get_payment(id)).await?))
}

async fn create(
    _: Operator,
    State(state): State<AppState>,
    payload: Result<Json<PaymentInput>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Created>)> {
    let Json(input) = payload?;
    let created = state.run(move |core| core.create_payment(&input)).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

async fn update(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PaymentInput>, JsonRejection>,
) -> ApiResult<Json<Message>> {
    let id = row_id(&id, NOT_FOUND)?;
    let Json(input) = payload?;
    let message = state
        .run(move |core| core.update_payment(id, &input))
        .await?;
    Ok(Json(message.into()))
}

async fn remove(
    _: Operator,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Message>> {
    let id = row_id(&id, NOT_FOUND)?;
    let message = state.run(move |core| core.delete_payment(id)).await?;
    Ok(Json(message.into()))
}
