use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::models::{Bet, BetKind, BetStatus};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn bet(day: &str, status: BetStatus, odds: Decimal, stake: Decimal, profit: Option<Decimal>) -> Bet {
    Bet {
        id: Uuid::new_v4(),
        user_id: Uuid::nil(),
        date: date(day),
        sport: Some("football".into()),
        event: Some("Home v Away".into()),
        manifestation: None,
        selection: Some("1".into()),
        bookmaker: Some("bookie".into()),
        tipster: None,
        timing: None,
        notes: None,
        kind: BetKind::Single,
        odds,
        stake,
        bonus: None,
        cashout_amount: None,
        liability: None,
        commission: None,
        status,
        payout: None,
        profit,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}
