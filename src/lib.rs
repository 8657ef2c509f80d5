pub mod api;
pub mod config;
pub mod db;
pub mod engine;
pub mod errors;
pub mod export;
pub mod metrics;
pub mod models;
pub mod services;

use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::mailer::Mailer;

#[derive(Clone)]
pub struct AppState {
    pub db: sqlx::PgPool,
    pub config: AppConfig,
    pub metrics_handle: metrics_exporter_prometheus::PrometheusHandle,
    pub mailer: Option<Arc<Mailer>>,
}
