//! Location store queries.

use anyhow::{Context, Result};
use sqlx::PgPool;
use uuid::Uuid;

use crate::db::models::Location;

const LOCATION_COLUMNS: &str =
    "id, lat, lon, image, caption, created_at, edited_at, username";

pub async fn insert_location(
    db: &PgPool,
    lat: f64,
    lon: f64,
    image: &str,
    caption: Option<&str>,
    username: &str,
) -> Result<Uuid> {
    sqlx::query_scalar::<_, Uuid>(
        "INSERT INTO locations (lat, lon, image, caption, username)
         VALUES ($1, $2, $3, $4, $5)
         RETURNING id",
    )
    .bind(lat)
    .bind(lon)
    .bind(image)
    .bind(caption)
    .bind(username)
    .fetch_one(db)
    .await
    .context("inserting location")
}

pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<Location>> {
    sqlx::query_as::<_, Location>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(db)
    .await
    .context("fetching location by id")
}

/// Most recent first, optionally restricted to one owner.
pub async fn list(db: &PgPool, limit: i64, owner: Option<&str>) -> Result<Vec<Location>> {
    match owner {
        Some(username) => sqlx::query_as::<_, Location>(&format!(
            "SELECT {LOCATION_COLUMNS}
               FROM locations
              WHERE username = $1
              ORDER BY created_at DESC
              LIMIT $2"
        ))
        .bind(username)
        .bind(limit)
        .fetch_all(db)
        .await
        .context("listing locations by owner"),
        None => sqlx::query_as::<_, Location>(&format!(
            "SELECT {LOCATION_COLUMNS}
               FROM locations
              ORDER BY created_at DESC
              LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(db)
        .await
        .context("listing locations"),
    }
}

/// One location chosen independently of insertion order.
pub async fn find_random(db: &PgPool) -> Result<Option<Location>> {
    sqlx::query_as::<_, Location>(&format!(
        "SELECT {LOCATION_COLUMNS} FROM locations ORDER BY random() LIMIT 1"
    ))
    .fetch_optional(db)
    .await
    .context("fetching random location")
}

pub async fn update_image_caption(
    db: &PgPool,
    id: Uuid,
    image: &str,
    caption: Option<&str>,
) -> Result<()> {
    sqlx::query(
        "UPDATE locations
            SET image = $2, caption = $3, edited_at = now()
          WHERE id = $1",
    )
    .bind(id)
    .bind(image)
    .bind(caption)
    .execute(db)
    .await
    .context("updating location")?;
    Ok(())
}

pub async fn delete(db: &PgPool, id: Uuid) -> Result<()> {
    sqlx::query("DELETE FROM locations WHERE id = $1")
        .bind(id)
        .execute(db)
        .await
        .context("deleting location")?;
    Ok(())
}
