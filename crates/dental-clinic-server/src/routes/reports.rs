//! Date-filtered reports.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use dental_clinic_core::{Report, ReportKind};

use crate::{ApiResult, AppState, Operator};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportQuery {
    start_date: Option<String>,
    end_date: Option<String>,
}

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/reports/:kind", get(report))
}

async fn report(
    _: Operator,
    State(state): State<AppState>,
    Path(kind): Path<String>,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> ApiResult<Json<Report>> {
    let kind: ReportKind = kind.parse()?;
    let Query(query) = query?;

    let report = state
        .run(move |core| {
            core.generate_report(kind, query.start_date.as_deref(), query.end_date.as_deref())
        })
        .await?;
    Ok(Json(report))
}
