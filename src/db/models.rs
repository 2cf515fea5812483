use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub username: String,
    /// Bcrypt hash, never serialized outward.
    #[serde(skip_serializing)]
    pub pass: String,
    pub name: String,
    pub surname: String,
    pub email: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Location {
    pub id: Uuid,
    pub lat: f64,
    pub lon: f64,
    /// Stored upload filename, `<millis>_<original>`.
    pub image: String,
    pub caption: Option<String>,
    pub created_at: DateTime<Utc>,
    pub edited_at: DateTime<Utc>,
    /// Owning user; exclusive edit/delete rights absent admin override.
    #[serde(rename = "user")]
    pub username: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Guess {
    pub id: Uuid,
    /// Distance/error metric; lower is better by convention.
    pub result: i64,
    pub guessed_at: DateTime<Utc>,
    pub guesser: String,
    pub location_id: Uuid,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Action {
    pub id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: String,
    pub component: String,
    pub value: Option<String>,
    pub url: String,
    pub performed_at: DateTime<Utc>,
    #[serde(rename = "user")]
    pub username: String,
}
