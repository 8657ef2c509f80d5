use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::selection::SelectionInput;
use super::{BetKind, BetStatus, ModelError, Timing};

/// Database row for the bets table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BetRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub sport: Option<String>,
    pub event: Option<String>,
    pub manifestation: Option<String>,
    pub selection: Option<String>,
    pub bookmaker: Option<String>,
    pub tipster: Option<String>,
    pub timing: Option<String>,
    pub notes: Option<String>,
    pub kind: String,
    pub odds: Decimal,
    pub stake: Decimal,
    pub bonus: Option<Decimal>,
    pub cashout_amount: Option<Decimal>,
    pub liability: Option<Decimal>,
    pub commission: Option<Decimal>,
    pub status: String,
    pub payout: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A bet with its categorical columns resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bet {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: NaiveDate,
    pub sport: Option<String>,
    pub event: Option<String>,
    pub manifestation: Option<String>,
    pub selection: Option<String>,
    pub bookmaker: Option<String>,
    pub tipster: Option<String>,
    pub timing: Option<Timing>,
    pub notes: Option<String>,
    pub kind: BetKind,
    pub odds: Decimal,
    pub stake: Decimal,
    pub bonus: Option<Decimal>,
    pub cashout_amount: Option<Decimal>,
    pub liability: Option<Decimal>,
    pub commission: Option<Decimal>,
    pub status: BetStatus,
    pub payout: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Bet {
    /// Profit as it enters sums: unsettled bets count as zero.
    pub fn profit_or_zero(&self) -> Decimal {
        self.profit.unwrap_or(Decimal::ZERO)
    }
}

impl TryFrom<BetRow> for Bet {
    type Error = ModelError;

    fn try_from(row: BetRow) -> Result<Self, Self::Error> {
        let kind = BetKind::from_api_str(&row.kind).ok_or_else(|| ModelError::UnknownKind(row.kind.clone()))?;
        let status =
            BetStatus::from_api_str(&row.status).ok_or_else(|| ModelError::UnknownStatus(row.status.clone()))?;
        let timing = match row.timing.as_deref() {
            None | Some("") => None,
            Some(t) => Some(Timing::from_api_str(t).ok_or_else(|| ModelError::UnknownTiming(t.to_string()))?),
        };

        Ok(Bet {
            id: row.id,
            user_id: row.user_id,
            date: row.date,
            sport: row.sport,
            event: row.event,
            manifestation: row.manifestation,
            selection: row.selection,
            bookmaker: row.bookmaker,
            tipster: row.tipster,
            timing,
            notes: row.notes,
            kind,
            odds: row.odds,
            stake: row.stake,
            bonus: row.bonus,
            cashout_amount: row.cashout_amount,
            liability: row.liability,
            commission: row.commission,
            status,
            payout: row.payout,
            profit: row.profit,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Convert fetched rows, dropping (and logging) any row with an unknown
/// categorical value instead of failing the whole read.
pub fn bets_from_rows(rows: Vec<BetRow>) -> Vec<Bet> {
    rows.into_iter()
        .filter_map(|row| {
            let id = row.id;
            match Bet::try_from(row) {
                Ok(bet) => Some(bet),
                Err(e) => {
                    tracing::warn!(bet_id = %id, error = %e, "Skipping unreadable bet row");
                    None
                }
            }
        })
        .collect()
}

/// User-entered fields for creating or editing a bet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetInput {
    pub date: NaiveDate,
    #[serde(default)]
    pub sport: Option<String>,
    #[serde(default)]
    pub event: Option<String>,
    #[serde(default)]
    pub manifestation: Option<String>,
    #[serde(default)]
    pub selection: Option<String>,
    #[serde(default)]
    pub bookmaker: Option<String>,
    #[serde(default)]
    pub tipster: Option<String>,
    #[serde(default)]
    pub timing: Option<Timing>,
    #[serde(default)]
    pub notes: Option<String>,
    pub kind: BetKind,
    pub odds: Decimal,
    pub stake: Decimal,
    #[serde(default)]
    pub bonus: Option<Decimal>,
    #[serde(default)]
    pub cashout_amount: Option<Decimal>,
    #[serde(default)]
    pub liability: Option<Decimal>,
    #[serde(default)]
    pub commission: Option<Decimal>,
    #[serde(default = "default_status")]
    pub status: BetStatus,
    #[serde(default)]
    pub selections: Vec<SelectionInput>,
}

fn default_status() -> BetStatus {
    BetStatus::Pending
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn row(kind: &str, status: &str, timing: Option<&str>) -> BetRow {
        BetRow {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, 10).unwrap(),
            sport: Some("football".into()),
            event: None,
            manifestation: None,
            selection: None,
            bookmaker: None,
            tipster: None,
            timing: timing.map(String::from),
            notes: None,
            kind: kind.into(),
            odds: dec!(2.0),
            stake: dec!(10),
            bonus: None,
            cashout_amount: None,
            liability: None,
            commission: None,
            status: status.into(),
            payout: None,
            profit: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_row_conversion() {
        let bet = Bet::try_from(row("multiple", "won", Some("live"))).unwrap();
        assert_eq!(bet.kind, BetKind::Multiple);
        assert_eq!(bet.status, BetStatus::Won);
        assert_eq!(bet.timing, Some(Timing::Live));
    }

    #[test]
    fn test_empty_timing_is_none() {
        let bet = Bet::try_from(row("single", "pending", Some(""))).unwrap();
        assert_eq!(bet.timing, None);
    }

    #[test]
    fn test_unknown_rows_are_skipped() {
        let bets = bets_from_rows(vec![row("single", "won", None), row("parlay", "won", None)]);
        assert_eq!(bets.len(), 1);
    }

    #[test]
    fn test_input_defaults_to_pending() {
        let input: BetInput = serde_json::from_str(
            r#"{"date":"2024-03-10","kind":"single","odds":"2.5","stake":"50"}"#,
        )
        .unwrap();
        assert_eq!(input.status, BetStatus::Pending);
        assert!(input.selections.is_empty());
    }
}
