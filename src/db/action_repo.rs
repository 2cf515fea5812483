//! Append-only UI telemetry log.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Action;

pub async fn insert_action(
    db: &PgPool,
    kind: &str,
    component: &str,
    value: Option<&str>,
    url: &str,
    username: &str,
) -> Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        r#"INSERT INTO actions (type, component, value, url, username)
           VALUES ($1, $2, $3, $4, $5)
           RETURNING id"#,
    )
    .bind(kind)
    .bind(component)
    .bind(value)
    .bind(url)
    .bind(username)
    .fetch_one(db)
    .await
    .context("inserting action")
}

/// Newest first, usernames matching the search substring.
pub async fn list(db: &PgPool, limit: i64, search: &str) -> Result<Vec<Action>> {
    sqlx::query_as::<_, Action>(
        r#"SELECT id, type, component, value, url, performed_at, username
             FROM actions
            WHERE username LIKE '%' || $1 || '%'
            ORDER BY performed_at DESC
            LIMIT $2"#,
    )
    .bind(search)
    .bind(limit)
    .fetch_all(db)
    .await
    .context("listing actions")
}

/// Bulk delete by id; returns how many rows went away.
pub async fn delete_by_ids(db: &PgPool, ids: &[Uuid]) -> Result<u64> {
    let result = sqlx::query("DELETE FROM actions WHERE id = ANY($1)")
        .bind(ids)
        .execute(db)
        .await
        .context("deleting actions")?;
    Ok(result.rows_affected())
}
