use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::selection_repo;
use crate::engine::Settlement;
use crate::models::{BetInput, BetRow, BetStatus};

/// Insert a new bet with its settled fields and selections in one transaction.
pub async fn insert_bet(
    pool: &PgPool,
    user_id: Uuid,
    input: &BetInput,
    settlement: &Settlement,
) -> anyhow::Result<BetRow> {
    let mut tx = pool.begin().await?;

    let bet = sqlx::query_as::<_, BetRow>(
        r#"
        INSERT INTO bets (
            user_id, date, sport, event, manifestation, selection, bookmaker, tipster,
            timing, notes, kind, odds, stake, bonus, cashout_amount, liability, commission,
            status, payout, profit
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20)
        RETURNING *
        "#,
    )
    .bind(user_id)
    .bind(input.date)
    .bind(&input.sport)
    .bind(&input.event)
    .bind(&input.manifestation)
    .bind(&input.selection)
    .bind(&input.bookmaker)
    .bind(&input.tipster)
    .bind(input.timing.map(|t| t.as_str()))
    .bind(&input.notes)
    .bind(input.kind.as_str())
    .bind(settlement.odds)
    .bind(input.stake)
    .bind(input.bonus)
    .bind(input.cashout_amount)
    .bind(input.liability)
    .bind(input.commission)
    .bind(settlement.status.as_str())
    .bind(settlement.payout)
    .bind(settlement.profit)
    .fetch_one(&mut *tx)
    .await?;

    selection_repo::insert_selections(&mut tx, bet.id, &input.selections).await?;

    tx.commit().await?;
    Ok(bet)
}

/// Overwrite a bet's fields and replace all of its selections.
pub async fn update_bet(
    pool: &PgPool,
    id: Uuid,
    input: &BetInput,
    settlement: &Settlement,
) -> anyhow::Result<Option<BetRow>> {
    let mut tx = pool.begin().await?;

    let bet = sqlx::query_as::<_, BetRow>(
        r#"
        UPDATE bets
        SET date = $2, sport = $3, event = $4, manifestation = $5, selection = $6,
            bookmaker = $7, tipster = $8, timing = $9, notes = $10, kind = $11,
            odds = $12, stake = $13, bonus = $14, cashout_amount = $15, liability = $16,
            commission = $17, status = $18, payout = $19, profit = $20, updated_at = NOW()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.date)
    .bind(&input.sport)
    .bind(&input.event)
    .bind(&input.manifestation)
    .bind(&input.selection)
    .bind(&input.bookmaker)
    .bind(&input.tipster)
    .bind(input.timing.map(|t| t.as_str()))
    .bind(&input.notes)
    .bind(input.kind.as_str())
    .bind(settlement.odds)
    .bind(input.stake)
    .bind(input.bonus)
    .bind(input.cashout_amount)
    .bind(input.liability)
    .bind(input.commission)
    .bind(settlement.status.as_str())
    .bind(settlement.payout)
    .bind(settlement.profit)
    .fetch_optional(&mut *tx)
    .await?;

    let Some(bet) = bet else {
        tx.rollback().await?;
        return Ok(None);
    };

    selection_repo::replace_selections(&mut tx, bet.id, &input.selections).await?;

    tx.commit().await?;
    Ok(Some(bet))
}

pub async fn get_bet(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<BetRow>> {
    let bet = sqlx::query_as::<_, BetRow>("SELECT * FROM bets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(bet)
}

/// Delete a bet and its selections. Returns false if it did not exist.
pub async fn delete_bet(pool: &PgPool, id: Uuid) -> anyhow::Result<bool> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM bet_selections WHERE bet_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM bets WHERE id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(result.rows_affected() > 0)
}

/// All bets of a user, newest first.
pub async fn get_bets_by_user(pool: &PgPool, user_id: Uuid) -> anyhow::Result<Vec<BetRow>> {
    let bets = sqlx::query_as::<_, BetRow>(
        "SELECT * FROM bets WHERE user_id = $1 ORDER BY date DESC, created_at DESC",
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}

/// Bets of a user dated within `[start, end]` whose status is in `statuses`.
pub async fn get_bets_in_range(
    pool: &PgPool,
    user_id: Uuid,
    start: NaiveDate,
    end: NaiveDate,
    statuses: &[BetStatus],
) -> anyhow::Result<Vec<BetRow>> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.as_str().to_string()).collect();

    let bets = sqlx::query_as::<_, BetRow>(
        r#"
        SELECT * FROM bets
        WHERE user_id = $1 AND date >= $2 AND date <= $3 AND status = ANY($4)
        ORDER BY date ASC, created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(start)
    .bind(end)
    .bind(statuses)
    .fetch_all(pool)
    .await?;

    Ok(bets)
}
