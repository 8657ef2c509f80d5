use std::time::Instant;

use futures_util::future::join_all;
use metrics::{counter, histogram};
use rust_decimal::Decimal;
use sqlx::PgPool;

use crate::db::{bet_repo, profile_repo};
use crate::engine::{rank_tipsters, DateWindow, Leaderboard, RankMetric};
use crate::models::bet::bets_from_rows;
use crate::models::{BetRow, Profile, TipsterBook, RANKABLE_STATUSES};

/// Load every tipster's settled bets for `window` and rank them.
///
/// Bets are fetched per tipster concurrently. A tipster whose fetch fails is
/// left off the board and counted; the rest are still ranked.
pub async fn build_leaderboard(
    pool: &PgPool,
    window: DateWindow,
    metric: RankMetric,
    top_n: usize,
    default_bankroll: Decimal,
) -> anyhow::Result<Leaderboard> {
    let started = Instant::now();

    let tipsters = profile_repo::get_tipsters(pool).await?;
    let books = load_books(pool, &tipsters, &window, default_bankroll).await;

    let ranked = rank_tipsters(&books, &window, metric, top_n);

    histogram!("leaderboard_build_seconds").record(started.elapsed().as_secs_f64());
    tracing::debug!(
        tipsters = tipsters.len(),
        ranked = ranked.len(),
        start = %window.start,
        end = %window.end,
        "Leaderboard built"
    );

    Ok(Leaderboard::from_ranked(window, metric, ranked))
}

async fn load_books(
    pool: &PgPool,
    tipsters: &[Profile],
    window: &DateWindow,
    default_bankroll: Decimal,
) -> Vec<TipsterBook> {
    let fetches = tipsters.iter().map(|profile| async move {
        let result =
            bet_repo::get_bets_in_range(pool, profile.id, window.start, window.end, &RANKABLE_STATUSES).await;
        (profile, result)
    });

    books_from_results(join_all(fetches).await, default_bankroll)
}

/// Turn per-tipster fetch results into ranking input. Failed fetches are
/// logged, counted and dropped.
fn books_from_results<'a>(
    results: impl IntoIterator<Item = (&'a Profile, anyhow::Result<Vec<BetRow>>)>,
    default_bankroll: Decimal,
) -> Vec<TipsterBook> {
    results
        .into_iter()
        .filter_map(|(profile, result)| match result {
            Ok(rows) => Some(TipsterBook {
                tipster_id: profile.id,
                name: profile.name(),
                bankroll: profile.bankroll_or(default_bankroll),
                bets: bets_from_rows(rows),
            }),
            Err(e) => {
                tracing::warn!(error = %e, tipster_id = %profile.id, "Excluding tipster from ranking");
                counter!("ranking_tipsters_excluded_total").increment(1);
                None
            }
        })
        .collect()
}
