use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::load_user_bets;
use crate::engine::{aggregate, bankroll_evolution, monthly_breakdown, MonthOrder};
use crate::export::{rows_to_csv, to_export_rows, to_report_sections, ExportRow, NumberFormat, Report};
use crate::AppState;

use super::{user_bankroll, ApiResponse};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Overrides the configured export locale.
    pub locale: Option<String>,
}

fn number_format(state: &AppState, q: &ExportQuery) -> NumberFormat {
    NumberFormat::from_locale(q.locale.as_deref().unwrap_or(&state.config.locale))
}

/// GET /api/users/:user_id/export/rows
pub async fn rows(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<ExportQuery>,
) -> Json<ApiResponse<Vec<ExportRow>>> {
    let bets = load_user_bets(&state.db, user_id).await;
    let bankroll = user_bankroll(&state, user_id).await;
    ApiResponse::ok(to_export_rows(&bets, bankroll, &number_format(&state, &q)))
}

/// GET /api/users/:user_id/export/csv
pub async fn csv(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<ExportQuery>,
) -> impl IntoResponse {
    let bets = load_user_bets(&state.db, user_id).await;
    let bankroll = user_bankroll(&state, user_id).await;
    let body = rows_to_csv(&to_export_rows(&bets, bankroll, &number_format(&state, &q)));

    (
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8"),
            (CONTENT_DISPOSITION, "attachment; filename=\"bets.csv\""),
        ],
        body,
    )
}

/// GET /api/users/:user_id/export/report
pub async fn report(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Query(q): Query<ExportQuery>,
) -> Json<ApiResponse<Report>> {
    let bets = load_user_bets(&state.db, user_id).await;
    let bankroll = user_bankroll(&state, user_id).await;
    let fmt = number_format(&state, &q);

    let stats = aggregate(&bets, bankroll);
    let monthly = monthly_breakdown(&bets, MonthOrder::Chronological);
    let evolution = bankroll_evolution(bankroll, &bets);

    ApiResponse::ok(to_report_sections("Betting performance", &stats, &monthly, &evolution, &fmt))
}
