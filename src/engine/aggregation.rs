use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{Bet, BetStatus};

/// Portfolio-level statistics over a collection of bets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioStats {
    pub total_bets: usize,
    pub won_bets: usize,
    pub lost_bets: usize,
    pub cashout_bets: usize,
    pub void_bets: usize,
    pub pending_bets: usize,
    pub total_stake: Decimal,
    pub total_profit: Decimal,
    /// Percent of stake.
    pub roi: Decimal,
    /// Percent of all bets.
    pub win_rate: Decimal,
    pub avg_odds: Decimal,
    pub avg_stake: Decimal,
    pub current_streak: u32,
    pub best_streak: u32,
    pub bankroll: Decimal,
    /// Percent of bankroll.
    pub profit_percent: Decimal,
    pub max_drawdown: Decimal,
}

impl Default for PortfolioStats {
    fn default() -> Self {
        Self {
            total_bets: 0,
            won_bets: 0,
            lost_bets: 0,
            cashout_bets: 0,
            void_bets: 0,
            pending_bets: 0,
            total_stake: Decimal::ZERO,
            total_profit: Decimal::ZERO,
            roi: Decimal::ZERO,
            win_rate: Decimal::ZERO,
            avg_odds: Decimal::ZERO,
            avg_stake: Decimal::ZERO,
            current_streak: 0,
            best_streak: 0,
            bankroll: Decimal::ZERO,
            profit_percent: Decimal::ZERO,
            max_drawdown: Decimal::ZERO,
        }
    }
}

/// Compute portfolio statistics. Bet order does not matter; streaks and
/// drawdown are taken over the bets sorted chronologically.
pub fn aggregate(bets: &[Bet], bankroll: Decimal) -> PortfolioStats {
    if bets.is_empty() {
        return PortfolioStats {
            bankroll,
            ..PortfolioStats::default()
        };
    }

    let ordered = chronological(bets);
    let count = |status: BetStatus| bets.iter().filter(|b| b.status == status).count();

    let total_bets = bets.len();
    let won_bets = count(BetStatus::Won);
    let total_stake = bets.iter().map(|b| b.stake).sum::<Decimal>();
    let total_profit = bets.iter().map(Bet::profit_or_zero).sum::<Decimal>();
    let total_odds = bets.iter().map(|b| b.odds).sum::<Decimal>();

    let statuses: Vec<BetStatus> = ordered.iter().map(|b| b.status).collect();
    let (current_streak, best_streak) = streaks(&statuses);

    let profits: Vec<Decimal> = ordered.iter().map(|b| b.profit_or_zero()).collect();

    PortfolioStats {
        total_bets,
        won_bets,
        lost_bets: count(BetStatus::Lost),
        cashout_bets: count(BetStatus::Cashout),
        void_bets: count(BetStatus::Void),
        pending_bets: count(BetStatus::Pending),
        total_stake,
        total_profit,
        roi: percent(total_profit, total_stake),
        win_rate: percent(Decimal::from(won_bets as u64), Decimal::from(total_bets as u64)),
        avg_odds: ratio(total_odds, Decimal::from(total_bets as u64)),
        avg_stake: ratio(total_stake, Decimal::from(total_bets as u64)),
        current_streak,
        best_streak,
        bankroll,
        profit_percent: percent(total_profit, bankroll),
        max_drawdown: max_drawdown(&profits),
    }
}

/// Winning streaks over statuses ordered oldest first.
///
/// Returns `(current, best)`: the run of wins ending at the last status and
/// the longest run anywhere.
pub fn streaks(statuses: &[BetStatus]) -> (u32, u32) {
    let mut current = 0u32;
    let mut best = 0u32;

    for status in statuses {
        if *status == BetStatus::Won {
            current += 1;
            best = best.max(current);
        } else {
            current = 0;
        }
    }

    (current, best)
}

/// Largest peak-to-trough drop of the cumulative profit curve.
pub fn max_drawdown(profits: &[Decimal]) -> Decimal {
    let mut cumulative = Decimal::ZERO;
    let mut peak = Decimal::ZERO;
    let mut max_dd = Decimal::ZERO;

    for p in profits {
        cumulative += *p;
        peak = peak.max(cumulative);
        max_dd = max_dd.max(peak - cumulative);
    }

    max_dd
}

/// Stake expressed as a percentage of bankroll.
pub fn stake_percent(stake: Decimal, bankroll: Decimal) -> Decimal {
    percent(stake, bankroll)
}

/// `part / whole * 100`, or zero when `whole` is not positive.
pub fn percent(part: Decimal, whole: Decimal) -> Decimal {
    ratio(part, whole) * Decimal::ONE_HUNDRED
}

fn ratio(part: Decimal, whole: Decimal) -> Decimal {
    if whole <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    part / whole
}

fn chronological(bets: &[Bet]) -> Vec<&Bet> {
    let mut ordered: Vec<&Bet> = bets.iter().collect();
    ordered.sort_by(|a, b| {
        a.date
            .cmp(&b.date)
            .then(a.created_at.cmp(&b.created_at))
            .then(a.id.cmp(&b.id))
    });
    ordered
}

// ---------------------------------------------------------------------------
// Monthly grouping
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthOrder {
    /// Oldest month first, for trend charts.
    Chronological,
    /// Most recent month first, for the archive.
    NewestFirst,
}

impl MonthOrder {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "chronological" | "asc" => Some(MonthOrder::Chronological),
            "newest_first" | "desc" => Some(MonthOrder::NewestFirst),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyStats {
    pub year: i32,
    pub month: u32,
    pub bets_count: usize,
    pub won_count: usize,
    pub total_stake: Decimal,
    pub total_profit: Decimal,
    pub win_rate: Decimal,
    pub roi: Decimal,
}

impl MonthlyStats {
    /// `YYYY-MM` label.
    pub fn label(&self) -> String {
        format!("{:04}-{:02}", self.year, self.month)
    }
}

/// Partition bets by calendar month of their date.
pub fn monthly_breakdown(bets: &[Bet], order: MonthOrder) -> Vec<MonthlyStats> {
    let mut grouped: BTreeMap<(i32, u32), Vec<&Bet>> = BTreeMap::new();
    for bet in bets {
        grouped
            .entry((bet.date.year(), bet.date.month()))
            .or_default()
            .push(bet);
    }

    let months = grouped.into_iter().map(|((year, month), group)| {
        let bets_count = group.len();
        let won_count = group.iter().filter(|b| b.status == BetStatus::Won).count();
        let total_stake = group.iter().map(|b| b.stake).sum::<Decimal>();
        let total_profit = group.iter().map(|b| b.profit_or_zero()).sum::<Decimal>();

        MonthlyStats {
            year,
            month,
            bets_count,
            won_count,
            total_stake,
            total_profit,
            win_rate: percent(Decimal::from(won_count as u64), Decimal::from(bets_count as u64)),
            roi: percent(total_profit, total_stake),
        }
    });

    match order {
        MonthOrder::Chronological => months.collect(),
        MonthOrder::NewestFirst => months.rev().collect(),
    }
}

// ---------------------------------------------------------------------------
// Bankroll evolution
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankrollPoint {
    pub date: NaiveDate,
    pub bankroll: Decimal,
    pub percent_of_initial: Decimal,
    pub daily_profit: Decimal,
}

/// Walk bets day by day, adding each day's profit to the running bankroll.
pub fn bankroll_evolution(initial: Decimal, bets: &[Bet]) -> Vec<BankrollPoint> {
    let mut daily: BTreeMap<NaiveDate, Decimal> = BTreeMap::new();
    for bet in bets {
        *daily.entry(bet.date).or_insert(Decimal::ZERO) += bet.profit_or_zero();
    }

    let mut running = initial;
    daily
        .into_iter()
        .map(|(date, daily_profit)| {
            running += daily_profit;
            BankrollPoint {
                date,
                bankroll: running,
                percent_of_initial: percent(running, initial),
                daily_profit,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Breakdown by dimension
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Sport,
    Bookmaker,
    Tipster,
    Kind,
    Timing,
}

impl Dimension {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "sport" => Some(Dimension::Sport),
            "bookmaker" => Some(Dimension::Bookmaker),
            "tipster" => Some(Dimension::Tipster),
            "kind" | "type" => Some(Dimension::Kind),
            "timing" => Some(Dimension::Timing),
            _ => None,
        }
    }

    fn key_of(&self, bet: &Bet) -> String {
        let value = match self {
            Dimension::Sport => bet.sport.clone(),
            Dimension::Bookmaker => bet.bookmaker.clone(),
            Dimension::Tipster => bet.tipster.clone(),
            Dimension::Kind => Some(bet.kind.to_string()),
            Dimension::Timing => bet.timing.map(|t| t.to_string()),
        };
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| UNSPECIFIED.to_string())
    }
}

/// Bucket key for bets missing the grouped field.
pub const UNSPECIFIED: &str = "unspecified";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub key: String,
    pub bets: usize,
    pub won: usize,
    pub stake: Decimal,
    pub profit: Decimal,
    pub roi: Decimal,
    pub win_rate: Decimal,
}

/// Group bets by one descriptive field, sorted by key.
pub fn breakdown(bets: &[Bet], dimension: Dimension) -> Vec<DimensionStats> {
    let mut grouped: BTreeMap<String, Vec<&Bet>> = BTreeMap::new();
    for bet in bets {
        grouped.entry(dimension.key_of(bet)).or_default().push(bet);
    }

    grouped
        .into_iter()
        .map(|(key, group)| {
            let total = group.len();
            let won = group.iter().filter(|b| b.status == BetStatus::Won).count();
            let stake = group.iter().map(|b| b.stake).sum::<Decimal>();
            let profit = group.iter().map(|b| b.profit_or_zero()).sum::<Decimal>();

            DimensionStats {
                key,
                bets: total,
                won,
                stake,
                profit,
                roi: percent(profit, stake),
                win_rate: percent(Decimal::from(won as u64), Decimal::from(total as u64)),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::bet;
    use rust_decimal_macros::dec;

    #[test]
    fn test_aggregate_basic() {
        let bets = vec![
            bet("2024-01-05", BetStatus::Won, dec!(2.5), dec!(50), Some(dec!(75))),
            bet("2024-01-06", BetStatus::Lost, dec!(3.2), dec!(30), Some(dec!(-30))),
            bet("2024-01-07", BetStatus::Cashout, dec!(2.0), dec!(60), Some(dec!(15))),
            bet("2024-01-08", BetStatus::Pending, dec!(1.5), dec!(10), None),
        ];
        let stats = aggregate(&bets, dec!(1000));

        assert_eq!(stats.total_bets, 4);
        assert_eq!(stats.won_bets, 1);
        assert_eq!(stats.pending_bets, 1);
        assert_eq!(stats.total_stake, dec!(150));
        assert_eq!(stats.total_profit, dec!(60));
        assert_eq!(stats.roi, dec!(40));
        assert_eq!(stats.win_rate, dec!(25));
        assert_eq!(stats.avg_odds, dec!(2.3));
        assert_eq!(stats.profit_percent, dec!(6));
    }

    #[test]
    fn test_aggregate_empty_is_zeroed() {
        let stats = aggregate(&[], dec!(500));
        assert_eq!(stats.roi, Decimal::ZERO);
        assert_eq!(stats.win_rate, Decimal::ZERO);
        assert_eq!(stats.avg_odds, Decimal::ZERO);
        assert_eq!(stats.bankroll, dec!(500));
    }

    #[test]
    fn test_zero_bankroll_profit_percent() {
        let bets = vec![bet("2024-01-05", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10)))];
        assert_eq!(aggregate(&bets, Decimal::ZERO).profit_percent, Decimal::ZERO);
        assert_eq!(stake_percent(dec!(10), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(stake_percent(dec!(10), dec!(200)), dec!(5));
    }

    #[test]
    fn test_streaks_from_most_recent_first() {
        use BetStatus::*;
        let mut newest_first = vec![Won, Won, Lost, Won];
        newest_first.reverse();
        assert_eq!(streaks(&newest_first), (2, 2));

        let mut newest_first = vec![Lost, Won, Won, Won];
        newest_first.reverse();
        assert_eq!(streaks(&newest_first), (0, 3));
    }

    #[test]
    fn test_aggregate_streaks_ignore_input_order() {
        let bets = vec![
            bet("2024-02-03", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10))),
            bet("2024-02-01", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10))),
            bet("2024-02-02", BetStatus::Lost, dec!(2), dec!(10), Some(dec!(-10))),
        ];
        let stats = aggregate(&bets, dec!(100));
        assert_eq!(stats.current_streak, 1);
        assert_eq!(stats.best_streak, 1);
    }

    #[test]
    fn test_max_drawdown() {
        let dd = max_drawdown(&[dec!(90), dec!(-10), dec!(-10), dec!(5)]);
        assert_eq!(dd, dec!(20));
        assert_eq!(max_drawdown(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_monthly_breakdown_ordering() {
        let bets = vec![
            bet("2024-01-05", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10))),
            bet("2024-03-01", BetStatus::Lost, dec!(2), dec!(20), Some(dec!(-20))),
            bet("2024-01-20", BetStatus::Lost, dec!(2), dec!(10), Some(dec!(-10))),
        ];

        let asc = monthly_breakdown(&bets, MonthOrder::Chronological);
        assert_eq!(asc.len(), 2);
        assert_eq!(asc[0].label(), "2024-01");
        assert_eq!(asc[0].bets_count, 2);
        assert_eq!(asc[0].win_rate, dec!(50));
        assert_eq!(asc[0].total_profit, Decimal::ZERO);

        let desc = monthly_breakdown(&bets, MonthOrder::NewestFirst);
        assert_eq!(desc[0].label(), "2024-03");
        assert_eq!(desc[0].roi, dec!(-100));
    }

    #[test]
    fn test_bankroll_evolution_groups_same_day() {
        let bets = vec![
            bet("2024-01-02", BetStatus::Lost, dec!(2), dec!(50), Some(dec!(-50))),
            bet("2024-01-01", BetStatus::Won, dec!(2), dec!(100), Some(dec!(100))),
            bet("2024-01-01", BetStatus::Pending, dec!(2), dec!(100), None),
            bet("2024-01-01", BetStatus::Lost, dec!(2), dec!(20), Some(dec!(-20))),
        ];
        let points = bankroll_evolution(dec!(1000), &bets);

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].daily_profit, dec!(80));
        assert_eq!(points[0].bankroll, dec!(1080));
        assert_eq!(points[0].percent_of_initial, dec!(108));
        assert_eq!(points[1].bankroll, dec!(1030));
    }

    #[test]
    fn test_bankroll_evolution_zero_initial() {
        let bets = vec![bet("2024-01-01", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10)))];
        let points = bankroll_evolution(Decimal::ZERO, &bets);
        assert_eq!(points[0].percent_of_initial, Decimal::ZERO);
    }

    #[test]
    fn test_breakdown_by_sport() {
        let mut tennis = bet("2024-01-01", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10)));
        tennis.sport = Some("tennis".into());
        let mut football = bet("2024-01-01", BetStatus::Lost, dec!(2), dec!(10), Some(dec!(-10)));
        football.sport = Some("football".into());
        let mut blank = bet("2024-01-01", BetStatus::Lost, dec!(2), dec!(10), Some(dec!(-10)));
        blank.sport = None;

        let rows = breakdown(&[tennis, football, blank], Dimension::Sport);
        let keys: Vec<&str> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["football", "tennis", UNSPECIFIED]);
        assert_eq!(rows[1].win_rate, dec!(100));
    }
}
