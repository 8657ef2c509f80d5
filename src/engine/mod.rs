pub mod aggregation;
pub mod period;
pub mod ranking;
pub mod settlement;

#[cfg(test)]
pub(crate) mod testutil;

pub use aggregation::{
    aggregate, bankroll_evolution, breakdown, monthly_breakdown, stake_percent, streaks, BankrollPoint, Dimension,
    DimensionStats, MonthOrder, MonthlyStats, PortfolioStats,
};
pub use period::{resolve_window, DateWindow, PeriodError, PeriodPreset};
pub use ranking::{rank_tipsters, tipster_stats, Leaderboard, RankMetric, RankedEntry};
pub use settlement::{combine_legs, settle, settle_input, BetTerms, Leg, LegSummary, Settlement, SettlementError};
