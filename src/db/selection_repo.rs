use sqlx::{PgPool, Postgres, Transaction};
use uuid::Uuid;

use crate::models::{SelectionInput, SelectionRow};

/// Get the selections of a bet in insertion order.
pub async fn get_selections(pool: &PgPool, bet_id: Uuid) -> anyhow::Result<Vec<SelectionRow>> {
    let rows = sqlx::query_as::<_, SelectionRow>(
        "SELECT * FROM bet_selections WHERE bet_id = $1 ORDER BY created_at ASC",
    )
    .bind(bet_id)
    .fetch_all(pool)
    .await?;

    Ok(rows)
}

/// Insert selections for a freshly created bet.
pub async fn insert_selections(
    tx: &mut Transaction<'_, Postgres>,
    bet_id: Uuid,
    selections: &[SelectionInput],
) -> anyhow::Result<()> {
    for s in selections {
        sqlx::query(
            r#"
            INSERT INTO bet_selections (bet_id, sport, event, odds, selection, individual_status, individual_payout)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(bet_id)
        .bind(&s.sport)
        .bind(&s.event)
        .bind(s.odds)
        .bind(&s.selection)
        .bind(s.status.as_str())
        .bind(s.payout)
        .execute(&mut **tx)
        .await?;
    }

    Ok(())
}

/// Replace every selection of a bet: delete all, then insert the new list.
pub async fn replace_selections(
    tx: &mut Transaction<'_, Postgres>,
    bet_id: Uuid,
    selections: &[SelectionInput],
) -> anyhow::Result<()> {
    sqlx::query("DELETE FROM bet_selections WHERE bet_id = $1")
        .bind(bet_id)
        .execute(&mut **tx)
        .await?;

    insert_selections(tx, bet_id, selections).await
}
