use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use dental_clinic_core::DashboardStats;

use crate::{ApiResult, AppState, Operator};

pub(super) fn routes() -> Router<AppState> {
    Router::new().route("/api/dashboard/stats", get(stats))
}

/// Upcoming appointments are counted from the server's local date.
async fn stats(_: Operator, State(state): State<AppState>) -> ApiResult<Json<DashboardStats>> {
    let today = chrono::Local::now().date_naive();
    Ok(Json(state.run(move |core| core.dashboard_stats(today)).await?))
}
