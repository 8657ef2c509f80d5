use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{BetInput, BetStatus, Selection, SelectionInput};

/// The money-relevant terms of a bet as entered by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BetTerms {
    pub odds: Decimal,
    pub stake: Decimal,
    pub status: BetStatus,
    pub bonus: Option<Decimal>,
    pub cashout_amount: Option<Decimal>,
}

impl From<&BetInput> for BetTerms {
    fn from(input: &BetInput) -> Self {
        Self {
            odds: input.odds,
            stake: input.stake,
            status: input.status,
            bonus: input.bonus,
            cashout_amount: input.cashout_amount,
        }
    }
}

/// One leg as seen by settlement: its odds and individual outcome.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Leg {
    pub odds: Decimal,
    pub status: BetStatus,
}

impl From<&Selection> for Leg {
    fn from(s: &Selection) -> Self {
        Self { odds: s.odds, status: s.status }
    }
}

impl From<&SelectionInput> for Leg {
    fn from(s: &SelectionInput) -> Self {
        Self { odds: s.odds, status: s.status }
    }
}

/// Derived fields written back onto the bet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub payout: Option<Decimal>,
    pub profit: Option<Decimal>,
    pub odds: Decimal,
    pub status: BetStatus,
}

/// Combined view of a multi-leg bet's selections.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LegSummary {
    /// Product of the active legs' odds; `None` when every leg is void.
    pub odds: Option<Decimal>,
    pub status: BetStatus,
    pub active_legs: usize,
}

/// Rejected settlement input. The user is expected to correct it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SettlementError {
    #[error("stake must be greater than zero (got {0})")]
    NonPositiveStake(Decimal),

    #[error("odds must be at least 1 (got {0})")]
    InvalidOdds(Decimal),

    #[error("selection {index} has negative odds ({odds})")]
    InvalidLegOdds { index: usize, odds: Decimal },

    #[error("bonus cannot be negative (got {0})")]
    NegativeBonus(Decimal),

    #[error("cashout amount cannot be negative (got {0})")]
    NegativeCashout(Decimal),

    #[error("a cashout bet needs a cashout amount")]
    MissingCashoutAmount,

    #[error("odds or amounts are too large to settle")]
    AmountOverflow,
}

/// Compute payout, profit, odds and final status for one bet.
///
/// With more than one leg the odds and status are derived from the legs and
/// the status on `terms` is ignored. A single leg (or none) leaves the bet
/// as entered.
pub fn settle(terms: &BetTerms, legs: &[Leg]) -> Result<Settlement, SettlementError> {
    validate(terms, legs)?;

    let (odds, status) = if legs.len() > 1 {
        let summary = combine_legs(legs)?;
        // All legs void: nothing left to price, the stake comes back.
        (summary.odds.unwrap_or(Decimal::ONE), summary.status)
    } else {
        (terms.odds, terms.status)
    };

    if status == BetStatus::Cashout && terms.cashout_amount.is_none() {
        return Err(SettlementError::MissingCashoutAmount);
    }

    let bonus = terms.bonus.unwrap_or(Decimal::ZERO);
    let stake = terms.stake;

    let (payout, profit) = match status {
        BetStatus::Won => {
            let payout = odds.checked_mul(stake).ok_or(SettlementError::AmountOverflow)?;
            let profit = (payout - stake)
                .checked_add(bonus)
                .ok_or(SettlementError::AmountOverflow)?;
            (Some(payout), Some(profit))
        }
        BetStatus::Lost => (None, Some(-stake)),
        BetStatus::Cashout => {
            let amount = terms.cashout_amount.unwrap_or(Decimal::ZERO);
            (Some(amount), Some(amount - stake))
        }
        BetStatus::Void => (Some(stake), Some(Decimal::ZERO)),
        BetStatus::Pending => (None, None),
    };

    Ok(Settlement { payout, profit, odds, status })
}

/// Settle a bet as entered on the form. Only multiple and system bets take
/// their odds and status from their selections.
pub fn settle_input(input: &BetInput) -> Result<Settlement, SettlementError> {
    let legs: Vec<Leg> = if input.kind.is_multi_leg() {
        input.selections.iter().map(Leg::from).collect()
    } else {
        Vec::new()
    };
    settle(&BetTerms::from(input), &legs)
}

/// Derive combined odds and aggregate status from a bet's legs.
///
/// Void legs are dropped first. Any lost leg loses the bet; otherwise all
/// legs won wins it; no legs left voids it; anything else is still pending.
/// Fails only when the combined odds do not fit in a `Decimal`.
pub fn combine_legs(legs: &[Leg]) -> Result<LegSummary, SettlementError> {
    let active: Vec<&Leg> = legs.iter().filter(|l| l.status != BetStatus::Void).collect();

    let odds = if active.is_empty() {
        None
    } else {
        let product = active
            .iter()
            .try_fold(Decimal::ONE, |acc, l| acc.checked_mul(l.odds))
            .ok_or(SettlementError::AmountOverflow)?;
        Some(product)
    };

    let status = if active.iter().any(|l| l.status == BetStatus::Lost) {
        BetStatus::Lost
    } else if active.is_empty() {
        BetStatus::Void
    } else if active.iter().all(|l| l.status == BetStatus::Won) {
        BetStatus::Won
    } else {
        BetStatus::Pending
    };

    Ok(LegSummary {
        odds,
        status,
        active_legs: active.len(),
    })
}

fn validate(terms: &BetTerms, legs: &[Leg]) -> Result<(), SettlementError> {
    if terms.stake <= Decimal::ZERO {
        return Err(SettlementError::NonPositiveStake(terms.stake));
    }

    if legs.len() > 1 {
        if let Some((index, leg)) = legs.iter().enumerate().find(|(_, l)| l.odds < Decimal::ZERO) {
            return Err(SettlementError::InvalidLegOdds { index, odds: leg.odds });
        }
    } else if terms.odds < Decimal::ONE {
        return Err(SettlementError::InvalidOdds(terms.odds));
    }

    if let Some(bonus) = terms.bonus {
        if bonus < Decimal::ZERO {
            return Err(SettlementError::NegativeBonus(bonus));
        }
    }

    if let Some(amount) = terms.cashout_amount {
        if amount < Decimal::ZERO {
            return Err(SettlementError::NegativeCashout(amount));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(odds: Decimal, stake: Decimal, status: BetStatus) -> BetTerms {
        BetTerms {
            odds,
            stake,
            status,
            bonus: None,
            cashout_amount: None,
        }
    }

    fn legs(pairs: &[(Decimal, BetStatus)]) -> Vec<Leg> {
        pairs.iter().map(|&(odds, status)| Leg { odds, status }).collect()
    }

    #[test]
    fn test_won_bet() {
        let s = settle(&terms(dec!(2.5), dec!(50), BetStatus::Won), &[]).unwrap();
        assert_eq!(s.payout, Some(dec!(125)));
        assert_eq!(s.profit, Some(dec!(75)));
    }

    #[test]
    fn test_won_bet_with_bonus() {
        let mut t = terms(dec!(1.8), dec!(20), BetStatus::Won);
        t.bonus = Some(dec!(5));
        let s = settle(&t, &[]).unwrap();
        assert_eq!(s.payout, Some(dec!(36)));
        assert_eq!(s.profit, Some(dec!(21)));
    }

    #[test]
    fn test_lost_bet_ignores_bonus() {
        let mut t = terms(dec!(3.2), dec!(30), BetStatus::Lost);
        t.bonus = Some(dec!(10));
        let s = settle(&t, &[]).unwrap();
        assert_eq!(s.payout, None);
        assert_eq!(s.profit, Some(dec!(-30)));
    }

    #[test]
    fn test_cashout_bet() {
        let mut t = terms(dec!(2.0), dec!(60), BetStatus::Cashout);
        t.cashout_amount = Some(dec!(75));
        t.bonus = Some(dec!(3));
        let s = settle(&t, &[]).unwrap();
        assert_eq!(s.payout, Some(dec!(75)));
        assert_eq!(s.profit, Some(dec!(15)));
    }

    #[test]
    fn test_cashout_without_amount_is_rejected() {
        let err = settle(&terms(dec!(2.0), dec!(60), BetStatus::Cashout), &[]).unwrap_err();
        assert_eq!(err, SettlementError::MissingCashoutAmount);
    }

    #[test]
    fn test_void_bet_returns_stake() {
        for (odds, stake) in [(dec!(1.01), dec!(0.5)), (dec!(250), dec!(10000))] {
            let s = settle(&terms(odds, stake, BetStatus::Void), &[]).unwrap();
            assert_eq!(s.payout, Some(stake));
            assert_eq!(s.profit, Some(Decimal::ZERO));
        }
    }

    #[test]
    fn test_pending_bet_has_no_result() {
        let s = settle(&terms(dec!(2.0), dec!(10), BetStatus::Pending), &[]).unwrap();
        assert_eq!(s.payout, None);
        assert_eq!(s.profit, None);
    }

    #[test]
    fn test_invalid_inputs() {
        assert_eq!(
            settle(&terms(dec!(2.0), dec!(0), BetStatus::Won), &[]).unwrap_err(),
            SettlementError::NonPositiveStake(dec!(0))
        );
        assert_eq!(
            settle(&terms(dec!(0.9), dec!(10), BetStatus::Won), &[]).unwrap_err(),
            SettlementError::InvalidOdds(dec!(0.9))
        );
        let mut t = terms(dec!(2.0), dec!(10), BetStatus::Won);
        t.bonus = Some(dec!(-1));
        assert_eq!(settle(&t, &[]).unwrap_err(), SettlementError::NegativeBonus(dec!(-1)));
    }

    #[test]
    fn test_combined_odds_skip_void_leg() {
        let l = legs(&[
            (dec!(2.0), BetStatus::Won),
            (dec!(3.0), BetStatus::Won),
            (dec!(4.0), BetStatus::Void),
            (dec!(1.5), BetStatus::Won),
        ]);
        let summary = combine_legs(&l).unwrap();
        assert_eq!(summary.odds, Some(dec!(9.0)));
        assert_eq!(summary.active_legs, 3);
    }

    #[test]
    fn test_aggregate_status_derivation() {
        let cases = [
            (vec![BetStatus::Won, BetStatus::Lost, BetStatus::Void], BetStatus::Lost),
            (vec![BetStatus::Won, BetStatus::Won, BetStatus::Void], BetStatus::Won),
            (vec![BetStatus::Void, BetStatus::Void], BetStatus::Void),
            (vec![BetStatus::Won, BetStatus::Pending], BetStatus::Pending),
            (vec![BetStatus::Pending, BetStatus::Lost], BetStatus::Lost),
        ];
        for (statuses, expected) in cases {
            let l: Vec<Leg> = statuses.into_iter().map(|status| Leg { odds: dec!(2), status }).collect();
            assert_eq!(combine_legs(&l).unwrap().status, expected);
        }
    }

    #[test]
    fn test_multi_leg_overrides_entered_status() {
        let l = legs(&[(dec!(2.0), BetStatus::Won), (dec!(1.5), BetStatus::Won)]);
        let s = settle(&terms(dec!(1.0), dec!(10), BetStatus::Pending), &l).unwrap();
        assert_eq!(s.status, BetStatus::Won);
        assert_eq!(s.odds, dec!(3.0));
        assert_eq!(s.payout, Some(dec!(30.0)));
        assert_eq!(s.profit, Some(dec!(20.0)));
    }

    #[test]
    fn test_all_void_legs_void_the_bet() {
        let l = legs(&[(dec!(2.0), BetStatus::Void), (dec!(1.5), BetStatus::Void)]);
        let s = settle(&terms(dec!(3.0), dec!(10), BetStatus::Won), &l).unwrap();
        assert_eq!(s.status, BetStatus::Void);
        assert_eq!(s.odds, Decimal::ONE);
        assert_eq!(s.profit, Some(Decimal::ZERO));
        assert_eq!(s.payout, Some(dec!(10)));
    }

    #[test]
    fn test_single_leg_keeps_bet_as_entered() {
        let l = legs(&[(dec!(5.0), BetStatus::Lost)]);
        let s = settle(&terms(dec!(2.0), dec!(10), BetStatus::Won), &l).unwrap();
        assert_eq!(s.status, BetStatus::Won);
        assert_eq!(s.odds, dec!(2.0));
    }

    #[test]
    fn test_settle_input_uses_legs_only_for_multi_leg_kinds() {
        let json = r#"{
            "date": "2024-03-10", "kind": "multiple", "odds": "1", "stake": "10", "status": "pending",
            "selections": [
                {"odds": "2.0", "status": "won"},
                {"odds": "3.0", "status": "void"},
                {"odds": "1.5", "status": "won"}
            ]
        }"#;
        let mut input: BetInput = serde_json::from_str(json).unwrap();
        let s = settle_input(&input).unwrap();
        assert_eq!(s.status, BetStatus::Won);
        assert_eq!(s.odds, dec!(3.0));

        input.kind = crate::models::BetKind::Exchange;
        input.odds = dec!(2.2);
        let s = settle_input(&input).unwrap();
        assert_eq!(s.status, BetStatus::Pending);
        assert_eq!(s.odds, dec!(2.2));
    }

    #[test]
    fn test_negative_leg_odds_rejected() {
        let l = legs(&[(dec!(2.0), BetStatus::Won), (dec!(-1.0), BetStatus::Won)]);
        let err = settle(&terms(dec!(1.0), dec!(10), BetStatus::Pending), &l).unwrap_err();
        assert_eq!(err, SettlementError::InvalidLegOdds { index: 1, odds: dec!(-1.0) });
    }

    #[test]
    fn test_leg_odds_product_overflow_rejected() {
        let l = vec![Leg { odds: dec!(1000), status: BetStatus::Won }; 10];
        let err = settle(&terms(dec!(1), dec!(10), BetStatus::Pending), &l).unwrap_err();
        assert_eq!(err, SettlementError::AmountOverflow);
        assert_eq!(combine_legs(&l).unwrap_err(), SettlementError::AmountOverflow);
    }

    #[test]
    fn test_huge_single_payout_rejected() {
        let err = settle(&terms(Decimal::MAX, dec!(2), BetStatus::Won), &[]).unwrap_err();
        assert_eq!(err, SettlementError::AmountOverflow);
    }

    #[test]
    fn test_bonus_overflow_rejected() {
        let mut t = terms(dec!(2), Decimal::MAX / dec!(4), BetStatus::Won);
        t.bonus = Some(Decimal::MAX);
        assert_eq!(settle(&t, &[]).unwrap_err(), SettlementError::AmountOverflow);
    }
}
