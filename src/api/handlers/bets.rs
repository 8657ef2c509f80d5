use axum::extract::{Path, State};
use axum::Json;
use metrics::counter;
use serde::Serialize;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::db::{bet_repo, load_user_bets, selection_repo};
use crate::engine::{combine_legs, Leg, LegSummary};
use crate::errors::AppError;
use crate::models::{Bet, BetInput, BetRow, Selection};
use crate::AppState;

use super::settle::settle_or_reject;
use super::ApiResponse;

#[derive(Serialize)]
pub struct BetDetail {
    pub bet: Bet,
    pub selections: Vec<Selection>,
    pub legs: Option<LegSummary>,
}

fn to_bet(row: BetRow) -> Result<Bet, AppError> {
    Bet::try_from(row).map_err(|e| AppError::Internal(e.into()))
}

/// GET /api/users/:user_id/bets — newest first
pub async fn list(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Json<ApiResponse<Vec<Bet>>> {
    ApiResponse::ok(load_user_bets(&state.db, user_id).await)
}

/// POST /api/users/:user_id/bets
pub async fn create(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<BetInput>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let settlement = settle_or_reject(&input)?;
    let row = bet_repo::insert_bet(&state.db, user_id, &input, &settlement).await?;
    counter!("bets_settled_total").increment(1);

    tracing::info!(
        bet_id = %row.id,
        user_id = %user_id,
        status = %settlement.status,
        "Bet recorded"
    );

    Ok(ApiResponse::ok(to_bet(row)?))
}

/// GET /api/bets/:id — bet with its selections
pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<BetDetail>>, AppError> {
    let row = bet_repo::get_bet(&state.db, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bet {id} not found")))?;
    let bet = to_bet(row)?;

    let selections: Vec<Selection> = selection_repo::get_selections(&state.db, id)
        .await?
        .into_iter()
        .map(Selection::try_from)
        .collect::<Result<_, _>>()
        .map_err(|e| AppError::Internal(e.into()))?;

    let legs = if bet.kind.is_multi_leg() && !selections.is_empty() {
        let legs: Vec<Leg> = selections.iter().map(Leg::from).collect();
        Some(combine_legs(&legs)?)
    } else {
        None
    };

    Ok(ApiResponse::ok(BetDetail { bet, selections, legs }))
}

/// PUT /api/bets/:id — re-settles from the submitted fields
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(input): Json<BetInput>,
) -> Result<Json<ApiResponse<Bet>>, AppError> {
    let settlement = settle_or_reject(&input)?;
    let row = bet_repo::update_bet(&state.db, id, &input, &settlement)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Bet {id} not found")))?;
    counter!("bets_settled_total").increment(1);

    tracing::info!(bet_id = %id, status = %settlement.status, "Bet updated");
    Ok(ApiResponse::ok(to_bet(row)?))
}

/// DELETE /api/bets/:id
pub async fn remove(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Value>>, AppError> {
    if !bet_repo::delete_bet(&state.db, id).await? {
        return Err(AppError::NotFound(format!("Bet {id} not found")));
    }

    tracing::info!(bet_id = %id, "Bet deleted");
    Ok(ApiResponse::ok(json!({ "deleted": id })))
}
