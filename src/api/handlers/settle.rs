use axum::Json;
use metrics::counter;
use serde::Serialize;

use crate::engine::{combine_legs, settle_input, Leg, LegSummary, Settlement};
use crate::errors::AppError;
use crate::models::BetInput;

use super::ApiResponse;

#[derive(Debug, Serialize)]
pub struct SettlePreview {
    pub settlement: Settlement,
    /// Present for multiple and system bets that carry selections.
    pub legs: Option<LegSummary>,
}

/// Settle form input, counting rejections.
pub(super) fn settle_or_reject(input: &BetInput) -> Result<Settlement, AppError> {
    settle_input(input).map_err(|e| {
        counter!("settlement_rejected_total").increment(1);
        tracing::debug!(error = %e, kind = %input.kind, "Settlement rejected");
        AppError::from(e)
    })
}

/// POST /api/settle/preview — derived fields for the bet form, nothing stored
pub async fn preview(Json(input): Json<BetInput>) -> Result<Json<ApiResponse<SettlePreview>>, AppError> {
    let settlement = settle_or_reject(&input)?;

    let legs = if input.kind.is_multi_leg() && !input.selections.is_empty() {
        let legs: Vec<Leg> = input.selections.iter().map(Leg::from).collect();
        Some(combine_legs(&legs)?)
    } else {
        None
    };

    Ok(ApiResponse::ok(SettlePreview { settlement, legs }))
}
