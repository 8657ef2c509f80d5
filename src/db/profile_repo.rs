use sqlx::PgPool;
use uuid::Uuid;

use crate::models::Profile;

pub async fn get_profile(pool: &PgPool, id: Uuid) -> anyhow::Result<Option<Profile>> {
    let profile = sqlx::query_as::<_, Profile>(
        "SELECT id, display_name, email, bankroll, is_tipster, created_at FROM profiles WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(profile)
}

/// Fetch every profile flagged as a tipster.
pub async fn get_tipsters(pool: &PgPool) -> anyhow::Result<Vec<Profile>> {
    let profiles = sqlx::query_as::<_, Profile>(
        r#"
        SELECT id, display_name, email, bankroll, is_tipster, created_at
        FROM profiles
        WHERE is_tipster = true
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(profiles)
}
