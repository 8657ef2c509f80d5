use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::load_user_bets;
use crate::engine::{
    aggregate, bankroll_evolution, breakdown as dimension_breakdown, monthly_breakdown, BankrollPoint, Dimension,
    DimensionStats, MonthOrder, MonthlyStats, PortfolioStats,
};
use crate::errors::AppError;
use crate::AppState;

use super::{user_bankroll, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub order: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BreakdownQuery {
    pub by: Option<String>,
}

/// GET /api/users/:user_id/stats
pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Json<ApiResponse<PortfolioStats>> {
    let bets = load_user_bets(&state.db, user_id).await;
    let bankroll = user_bankroll(&state, user_id).await;
    ApiResponse::ok(aggregate(&bets, bankroll))
}

/// GET /api/users/:user_id/monthly?order=chronological|newest_first
pub async fn monthly(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<MonthlyQuery>,
) -> Result<Json<ApiResponse<Vec<MonthlyStats>>>, AppError> {
    let order = match q.order.as_deref() {
        None => MonthOrder::NewestFirst,
        Some(o) => MonthOrder::from_api_str(o).ok_or_else(|| AppError::BadRequest(format!("unknown order: {o}")))?,
    };

    let bets = load_user_bets(&state.db, user_id).await;
    Ok(ApiResponse::ok(monthly_breakdown(&bets, order)))
}

/// GET /api/users/:user_id/bankroll
pub async fn bankroll(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Json<ApiResponse<Vec<BankrollPoint>>> {
    let bets = load_user_bets(&state.db, user_id).await;
    let initial = user_bankroll(&state, user_id).await;
    ApiResponse::ok(bankroll_evolution(initial, &bets))
}

/// GET /api/users/:user_id/breakdown?by=sport|bookmaker|tipster|kind|timing
pub async fn breakdown(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<BreakdownQuery>,
) -> Result<Json<ApiResponse<Vec<DimensionStats>>>, AppError> {
    let dimension = match q.by.as_deref() {
        None => Dimension::Sport,
        Some(d) => Dimension::from_api_str(d).ok_or_else(|| AppError::BadRequest(format!("unknown dimension: {d}")))?,
    };

    let bets = load_user_bets(&state.db, user_id).await;
    Ok(ApiResponse::ok(dimension_breakdown(&bets, dimension)))
}
