//! Guess store queries.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Guess;

/// Sort direction on the `result` column. Ascending is best-first under the
/// distance-error scoring convention; the direction is preserved exactly as
/// the clients expect it, not inferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultOrder {
    Asc,
    Desc,
}

impl ResultOrder {
    pub fn as_sql(self) -> &'static str {
        match self {
            ResultOrder::Asc => "ASC",
            ResultOrder::Desc => "DESC",
        }
    }

    /// The wire flag: `results == 1` selects ascending, anything else descending.
    pub fn from_flag(flag: i64) -> Self {
        if flag == 1 {
            ResultOrder::Asc
        } else {
            ResultOrder::Desc
        }
    }
}

/// Filter for guess listings; location and guesser restrictions compose.
#[derive(Debug, Clone)]
pub struct GuessFilter {
    pub limit: i64,
    pub location_id: Option<Uuid>,
    pub guesser: Option<String>,
    pub order: ResultOrder,
}

const GUESS_COLUMNS: &str = "id, result, guessed_at, guesser, location_id";

pub async fn insert_guess(
    db: &PgPool,
    guesser: &str,
    location_id: Uuid,
    result: i64,
) -> Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO guesses (result, guesser, location_id)
         VALUES ($1, $2, $3)
         RETURNING id",
    )
    .bind(result)
    .bind(guesser)
    .bind(location_id)
    .fetch_one(db)
    .await
    .context("inserting guess")
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Guess>> {
    sqlx::query_as::<_, Guess>(&format!(
        "SELECT {GUESS_COLUMNS} FROM guesses WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("fetching guess by id")
}

pub async fn list(db: &PgPool, filter: &GuessFilter) -> Result<Vec<Guess>> {
    let sql = build_list_sql(filter);
    let mut query = sqlx::query_as::<_, Guess>(&sql);
    if let Some(location_id) = filter.location_id {
        query = query.bind(location_id);
    }
    if let Some(guesser) = &filter.guesser {
        query = query.bind(guesser.clone());
    }
    query
        .bind(filter.limit)
        .fetch_all(db)
        .await
        .context("listing guesses")
}

/// Assembles the listing statement; bind positions follow the filter's
/// field order (location, then guesser, then limit).
pub fn build_list_sql(filter: &GuessFilter) -> String {
    let mut sql = format!("SELECT {GUESS_COLUMNS} FROM guesses");
    let mut next_bind = 1;
    if filter.location_id.is_some() {
        sql.push_str(&format!(" WHERE location_id = ${next_bind}"));
        next_bind += 1;
    }
    if filter.guesser.is_some() {
        let clause = if next_bind == 1 { " WHERE" } else { " AND" };
        sql.push_str(&format!("{clause} guesser = ${next_bind}"));
        next_bind += 1;
    }
    sql.push_str(&format!(
        " ORDER BY result {} LIMIT ${next_bind}",
        filter.order.as_sql()
    ));
    sql
}

/// Returns the guess id if `guesser` already guessed on this location.
pub async fn find_user_guess(
    db: &PgPool,
    guesser: &str,
    location_id: Uuid,
) -> Result<Option<Uuid>> {
    sqlx::query_scalar::<_, Uuid>(
        "SELECT id FROM guesses WHERE guesser = $1 AND location_id = $2 LIMIT 1",
    )
    .bind(guesser)
    .bind(location_id)
    .fetch_optional(db)
    .await
    .context("checking for an existing guess")
}

pub async fn count_for_location(db: &PgPool, location_id: Uuid) -> Result<i64> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM guesses WHERE location_id = $1")
        .bind(location_id)
        .fetch_one(db)
        .await
        .context("counting guesses for location")
}
