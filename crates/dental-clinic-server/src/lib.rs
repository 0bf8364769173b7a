//! Dental Clinic HTTP API
//!
//! JSON over HTTP in front of [`ClinicCore`]. Every route except health and
//! login requires an `Authorization: Bearer <token>` header. Store calls are
//! synchronous, so handlers run them on the blocking pool.

pub mod config;
pub mod error;
mod extract;
mod routes;

pub use config::{LogFormat, ServerConfig};
pub use error::{ApiError, ApiResult};
pub use extract::Operator;

use anyhow::{Context, Result};
use axum::Router;
use chrono::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use dental_clinic_core::{AccessGate, ClinicCore, ClinicResult};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    core: ClinicCore,
}

impl AppState {
    pub fn new(core: ClinicCore) -> Self {
        Self { core }
    }

    pub fn core(&self) -> &ClinicCore {
        &self.core
    }

    /// Run a store operation on the blocking pool.
    pub(crate) async fn run<T, F>(&self, op: F) -> ApiResult<T>
    where
        F: FnOnce(&ClinicCore) -> ClinicResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let core = self.core.clone();
        tokio::task::spawn_blocking(move || op(&core))
            .await
            .map_err(ApiError::internal)?
            .map_err(ApiError::from)
    }
}

/// Build the application router.
pub fn app(state: AppState) -> Router {
    routes::router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Open the store and provision accounts and demo data per `config`.
pub fn open_core(config: &ServerConfig) -> Result<ClinicCore> {
    if config.uses_default_secret() {
        warn!("using the built-in JWT secret; set DENTAL_JWT_SECRET in production");
    }

    let gate = AccessGate::new(config.jwt_secret.as_bytes())
        .with_ttl(Duration::hours(config.token_ttl_hours))
        .with_bcrypt_cost(config.bcrypt_cost);

    let core = ClinicCore::open(&config.database_path, gate)
        .with_context(|| format!("Failed to open database {}", config.database_path.display()))?;
    info!(path = %config.database_path.display(), "database ready");

    core.seed_default_admin(&config.admin_username, &config.admin_password)
        .context("Failed to provision admin account")?;

    if config.seed_sample_data {
        let seeded = core
            .seed_sample_data()
            .context("Failed to seed sample data")?;
        if seeded == 0 {
            info!("patients already present, sample data skipped");
        }
    }

    Ok(core)
}
