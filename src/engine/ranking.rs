use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::aggregation::{aggregate, PortfolioStats};
use super::period::DateWindow;
use crate::models::{Bet, TipsterBook};

/// Podium size on the leaderboard.
pub const PODIUM_SIZE: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankMetric {
    Roi,
    WinRate,
}

impl RankMetric {
    pub fn from_api_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "roi" => Some(RankMetric::Roi),
            "win_rate" | "winrate" | "hit_rate" => Some(RankMetric::WinRate),
            _ => None,
        }
    }

    fn value(&self, stats: &PortfolioStats) -> Decimal {
        match self {
            RankMetric::Roi => stats.roi,
            RankMetric::WinRate => stats.win_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEntry {
    pub rank: usize,
    pub tipster_id: Uuid,
    pub name: String,
    pub period_bets: usize,
    pub stats: PortfolioStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub window: DateWindow,
    pub metric: RankMetric,
    pub podium: Vec<RankedEntry>,
    pub table: Vec<RankedEntry>,
}

impl Leaderboard {
    pub fn from_ranked(window: DateWindow, metric: RankMetric, mut entries: Vec<RankedEntry>) -> Self {
        let table = entries.split_off(PODIUM_SIZE.min(entries.len()));
        Self {
            window,
            metric,
            podium: entries,
            table,
        }
    }
}

/// Bets of one tipster that count for a window: dated inside it and settled
/// as won, lost or cashed out.
pub fn period_bets<'a>(bets: &'a [Bet], window: &DateWindow) -> Vec<&'a Bet> {
    bets.iter()
        .filter(|b| window.contains(b.date) && b.status.is_rankable())
        .collect()
}

/// One tipster's statistics restricted to `window`.
pub fn tipster_stats(book: &TipsterBook, window: &DateWindow) -> (PortfolioStats, usize) {
    let filtered: Vec<Bet> = period_bets(&book.bets, window).into_iter().cloned().collect();
    (aggregate(&filtered, book.bankroll), filtered.len())
}

/// Rank tipsters by `metric` over `window`, best first.
///
/// Tipsters without a qualifying bet in the window are left out. Ties on the
/// metric fall back to total profit, then period bet count, then tipster id.
pub fn rank_tipsters(
    books: &[TipsterBook],
    window: &DateWindow,
    metric: RankMetric,
    top_n: usize,
) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = books
        .iter()
        .filter_map(|book| {
            let (stats, period_bets) = tipster_stats(book, window);
            if period_bets == 0 {
                return None;
            }
            Some(RankedEntry {
                rank: 0,
                tipster_id: book.tipster_id,
                name: book.name.clone(),
                period_bets,
                stats,
            })
        })
        .collect();

    entries.sort_by(|a, b| compare(a, b, metric));
    entries.truncate(top_n);

    for (i, entry) in entries.iter_mut().enumerate() {
        entry.rank = i + 1;
    }

    entries
}

fn compare(a: &RankedEntry, b: &RankedEntry, metric: RankMetric) -> Ordering {
    metric
        .value(&b.stats)
        .cmp(&metric.value(&a.stats))
        .then_with(|| b.stats.total_profit.cmp(&a.stats.total_profit))
        .then_with(|| b.period_bets.cmp(&a.period_bets))
        .then_with(|| a.tipster_id.cmp(&b.tipster_id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testutil::{bet, date};
    use crate::models::BetStatus;
    use rust_decimal_macros::dec;

    fn book(id: u128, name: &str, bets: Vec<Bet>) -> TipsterBook {
        TipsterBook {
            tipster_id: Uuid::from_u128(id),
            name: name.into(),
            bankroll: dec!(1000),
            bets,
        }
    }

    fn window() -> DateWindow {
        DateWindow::custom(date("2024-02-01"), date("2024-02-29")).unwrap()
    }

    #[test]
    fn test_rank_by_roi() {
        let books = vec![
            book(1, "steady", vec![bet("2024-02-10", BetStatus::Won, dec!(1.5), dec!(100), Some(dec!(50)))]),
            book(2, "sharp", vec![bet("2024-02-11", BetStatus::Won, dec!(3.0), dec!(100), Some(dec!(200)))]),
            book(3, "cold", vec![bet("2024-02-12", BetStatus::Lost, dec!(2.0), dec!(100), Some(dec!(-100)))]),
        ];
        let ranked = rank_tipsters(&books, &window(), RankMetric::Roi, 10);

        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["sharp", "steady", "cold"]);
        assert_eq!(ranked[0].rank, 1);
        assert_eq!(ranked[2].rank, 3);
    }

    #[test]
    fn test_tipster_without_bets_in_window_is_excluded() {
        let books = vec![
            book(1, "active", vec![bet("2024-02-10", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10)))]),
            book(2, "last_year", vec![bet("2023-02-10", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10)))]),
        ];
        let ranked = rank_tipsters(&books, &window(), RankMetric::WinRate, 10);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "active");
    }

    #[test]
    fn test_pending_and_void_do_not_qualify() {
        let books = vec![book(
            1,
            "idle",
            vec![
                bet("2024-02-10", BetStatus::Pending, dec!(2), dec!(10), None),
                bet("2024-02-11", BetStatus::Void, dec!(2), dec!(10), Some(dec!(0))),
            ],
        )];
        assert!(rank_tipsters(&books, &window(), RankMetric::Roi, 10).is_empty());
    }

    #[test]
    fn test_period_stats_exclude_out_of_window_bets() {
        let b = book(
            1,
            "mixed",
            vec![
                bet("2024-02-10", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10))),
                bet("2024-02-12", BetStatus::Cashout, dec!(2), dec!(10), Some(dec!(-4))),
                bet("2024-03-01", BetStatus::Lost, dec!(2), dec!(10), Some(dec!(-10))),
            ],
        );
        let (stats, count) = tipster_stats(&b, &window());
        assert_eq!(count, 2);
        assert_eq!(stats.total_profit, dec!(6));
        assert_eq!(stats.win_rate, dec!(50));
    }

    #[test]
    fn test_tie_break_is_deterministic() {
        let same = || vec![bet("2024-02-10", BetStatus::Won, dec!(2), dec!(10), Some(dec!(10)))];
        let richer = vec![bet("2024-02-10", BetStatus::Won, dec!(2), dec!(20), Some(dec!(20)))];
        let books = vec![book(9, "nine", same()), book(4, "four", same()), book(7, "richer", richer)];

        let ranked = rank_tipsters(&books, &window(), RankMetric::Roi, 10);
        let names: Vec<&str> = ranked.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["richer", "four", "nine"]);
    }

    #[test]
    fn test_top_n_and_podium_split() {
        let books: Vec<TipsterBook> = (1..=6)
            .map(|i| {
                let profit = Decimal::from(i * 10);
                book(
                    i as u128,
                    &format!("t{i}"),
                    vec![bet("2024-02-10", BetStatus::Won, dec!(2), dec!(100), Some(profit))],
                )
            })
            .collect();

        let ranked = rank_tipsters(&books, &window(), RankMetric::Roi, 5);
        assert_eq!(ranked.len(), 5);
        assert_eq!(ranked[0].name, "t6");

        let board = Leaderboard::from_ranked(window(), RankMetric::Roi, ranked);
        assert_eq!(board.podium.len(), 3);
        assert_eq!(board.table.len(), 2);
        assert_eq!(board.table[0].rank, 4);

        let small = Leaderboard::from_ranked(window(), RankMetric::Roi, vec![]);
        assert!(small.podium.is_empty() && small.table.is_empty());
    }
}
