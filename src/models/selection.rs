use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::{BetStatus, ModelError};

/// Database row for the bet_selections table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SelectionRow {
    pub id: Uuid,
    pub bet_id: Uuid,
    pub sport: Option<String>,
    pub event: Option<String>,
    pub odds: Decimal,
    pub selection: Option<String>,
    pub individual_status: String,
    pub individual_payout: Option<Decimal>,
}

/// One leg of a multiple or system bet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub id: Uuid,
    pub bet_id: Uuid,
    pub sport: Option<String>,
    pub event: Option<String>,
    pub odds: Decimal,
    pub selection: Option<String>,
    pub status: BetStatus,
    pub payout: Option<Decimal>,
}

impl TryFrom<SelectionRow> for Selection {
    type Error = ModelError;

    fn try_from(row: SelectionRow) -> Result<Self, Self::Error> {
        let status = BetStatus::from_api_str(&row.individual_status)
            .ok_or_else(|| ModelError::UnknownStatus(row.individual_status.clone()))?;

        Ok(Selection {
            id: row.id,
            bet_id: row.bet_id,
            sport: row.sport,
            event: row.event,
            odds: row.odds,
            selection: row.selection,
            status,
            payout: row.individual_payout,
        })
    }
}

/// A leg as entered on the bet form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionInput {
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    pub odds: Decimal,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default = "pending")]
    pub status: BetStatus,
    #[serde(default)]
    pub payout: Option<Decimal>,
}

fn pending() -> BetStatus {
    BetStatus::Pending
}
