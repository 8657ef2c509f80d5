pub mod analytics;
pub mod bets;
pub mod exports;
pub mod settle;
pub mod system;
pub mod tipsters;

use axum::Json;
use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::db::profile_repo;
use crate::AppState;

#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data: Some(data),
            error: None,
        })
    }
}

/// The user's bankroll for percentage figures, or the configured default when
/// the profile is missing or cannot be read.
pub(crate) async fn user_bankroll(state: &AppState, user_id: Uuid) -> Decimal {
    let fallback = state.config.default_bankroll;
    match profile_repo::get_profile(&state.db, user_id).await {
        Ok(Some(profile)) => profile.bankroll_or(fallback),
        Ok(None) => fallback,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "Failed to fetch profile, using default bankroll");
            fallback
        }
    }
}
