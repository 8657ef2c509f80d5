use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::Bet;

/// Database row for the profiles table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub display_name: Option<String>,
    pub email: Option<String>,
    pub bankroll: Option<Decimal>,
    pub is_tipster: bool,
    pub created_at: Option<DateTime<Utc>>,
}

impl Profile {
    pub fn bankroll_or(&self, fallback: Decimal) -> Decimal {
        self.bankroll.unwrap_or(fallback)
    }

    pub fn name(&self) -> String {
        self.display_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| self.id.to_string()[..8].to_string())
    }
}

/// A tipster together with the bets they authored, as handed to ranking.
#[derive(Debug, Clone)]
pub struct TipsterBook {
    pub tipster_id: Uuid,
    pub name: String,
    pub bankroll: Decimal,
    pub bets: Vec<Bet>,
}
