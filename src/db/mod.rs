pub mod bet_repo;
pub mod profile_repo;
pub mod report_repo;
pub mod selection_repo;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use uuid::Uuid;

use crate::models::bet::bets_from_rows;
use crate::models::Bet;

pub async fn init_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await?;

    // Verify connectivity
    sqlx::query("SELECT 1").execute(&pool).await?;

    Ok(pool)
}

/// Fetch a user's bets for read-only views. A failed fetch is logged and
/// treated as "no bets" so statistics come out zeroed instead of erroring.
pub async fn load_user_bets(pool: &PgPool, user_id: Uuid) -> Vec<Bet> {
    match bet_repo::get_bets_by_user(pool, user_id).await {
        Ok(rows) => bets_from_rows(rows),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "Failed to fetch bets, using empty set");
            Vec::new()
        }
    }
}
