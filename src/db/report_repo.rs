use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Whether a report of this type was already sent to the user for the period.
pub async fn was_sent(
    pool: &PgPool,
    user_id: Uuid,
    period_start: NaiveDate,
    report_type: &str,
) -> anyhow::Result<bool> {
    let row: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM report_sends
        WHERE user_id = $1 AND period_start = $2 AND report_type = $3
        "#,
    )
    .bind(user_id)
    .bind(period_start)
    .bind(report_type)
    .fetch_one(pool)
    .await?;

    Ok(row.0 > 0)
}

/// Log a successful send. Re-recording the same key is a no-op.
pub async fn record_sent(
    pool: &PgPool,
    user_id: Uuid,
    period_start: NaiveDate,
    report_type: &str,
) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO report_sends (user_id, period_start, report_type, sent_at)
        VALUES ($1, $2, $3, NOW())
        ON CONFLICT (user_id, period_start, report_type) DO NOTHING
        "#,
    )
    .bind(user_id)
    .bind(period_start)
    .bind(report_type)
    .execute(pool)
    .await?;

    Ok(())
}
