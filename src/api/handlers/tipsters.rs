use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::{bet_repo, profile_repo};
use crate::engine::{resolve_window, tipster_stats, DateWindow, Leaderboard, PortfolioStats, RankMetric};
use crate::errors::AppError;
use crate::models::bet::bets_from_rows;
use crate::models::{TipsterBook, RANKABLE_STATUSES};
use crate::services::leaderboard::build_leaderboard;
use crate::AppState;

use super::ApiResponse;

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RankingQuery {
    pub period: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub metric: Option<String>,
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct PeriodQuery {
    pub period: Option<String>,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct TipsterPeriodStats {
    pub tipster_id: Uuid,
    pub name: String,
    pub window: DateWindow,
    pub period_bets: usize,
    pub stats: PortfolioStats,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/tipsters/ranking — podium plus table for the window
pub async fn ranking(
    State(state): State<AppState>,
    Query(q): Query<RankingQuery>,
) -> Result<Json<ApiResponse<Leaderboard>>, AppError> {
    let today = Utc::now().date_naive();
    let window = resolve_window(q.period.as_deref(), today, q.start, q.end)?;

    let metric = match q.metric.as_deref() {
        None => RankMetric::Roi,
        Some(m) => RankMetric::from_api_str(m).ok_or_else(|| AppError::BadRequest(format!("unknown metric: {m}")))?,
    };

    let top_n = q
        .limit
        .unwrap_or(state.config.leaderboard_size)
        .clamp(1, state.config.ranking_list_size.max(1));

    let board = build_leaderboard(&state.db, window, metric, top_n, state.config.default_bankroll).await?;
    Ok(ApiResponse::ok(board))
}

/// GET /api/tipsters/:user_id/stats — one tipster over the window
pub async fn stats(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<PeriodQuery>,
) -> Result<Json<ApiResponse<TipsterPeriodStats>>, AppError> {
    let today = Utc::now().date_naive();
    let window = resolve_window(q.period.as_deref(), today, q.start, q.end)?;

    let profile = profile_repo::get_profile(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Tipster {user_id} not found")))?;

    let rows = bet_repo::get_bets_in_range(&state.db, user_id, window.start, window.end, &RANKABLE_STATUSES).await?;
    let book = TipsterBook {
        tipster_id: profile.id,
        name: profile.name(),
        bankroll: profile.bankroll_or(state.config.default_bankroll),
        bets: bets_from_rows(rows),
    };

    let (stats, period_bets) = tipster_stats(&book, &window);
    Ok(ApiResponse::ok(TipsterPeriodStats {
        tipster_id: book.tipster_id,
        name: book.name,
        window,
        period_bets,
        stats,
    }))
}
