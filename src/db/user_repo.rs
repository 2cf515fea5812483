//! User directory queries.

use anyhow::{Context, Result};
use sqlx::PgPool;

use crate::db::models::User;

pub async fn find_by_username(db: &PgPool, username: &str) -> Result<Option<User>> {
    sqlx::query_as::<_, User>(
        "SELECT username, pass, name, surname, email, avatar
           FROM users
          WHERE username = $1",
    )
    .bind(username)
    .fetch_optional(db)
    .await
    .context("fetching user by username")
}

pub async fn username_exists(db: &PgPool, username: &str) -> Result<bool> {
    sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
        .bind(username)
        .fetch_one(db)
        .await
        .context("checking username existence")
}

pub async fn insert_user(db: &PgPool, user: &User) -> Result<()> {
    sqlx::query(
        "INSERT INTO users (username, pass, name, surname, email)
         VALUES ($1, $2, $3, $4, $5)",
    )
    .bind(&user.username)
    .bind(&user.pass)
    .bind(&user.name)
    .bind(&user.surname)
    .bind(&user.email)
    .execute(db)
    .await
    .context("inserting user")?;
    Ok(())
}

/// Substring search on username, admin listing.
pub async fn search_users(db: &PgPool, search: &str) -> Result<Vec<User>> {
    sqlx::query_as::<_, User>(
        "SELECT username, pass, name, surname, email, avatar
           FROM users
          WHERE username LIKE '%' || $1 || '%'
          ORDER BY username",
    )
    .bind(search)
    .fetch_all(db)
    .await
    .context("searching users")
}

/// Applies profile fields; renames only when `new_username` differs.
/// Referencing rows follow via `ON UPDATE CASCADE`.
pub async fn update_info(
    db: &PgPool,
    current_username: &str,
    new_username: &str,
    name: &str,
    surname: &str,
    email: &str,
) -> Result<()> {
    sqlx::query(
        "UPDATE users
            SET username = $2, name = $3, surname = $4, email = $5
          WHERE username = $1",
    )
    .bind(current_username)
    .bind(new_username)
    .bind(name)
    .bind(surname)
    .bind(email)
    .execute(db)
    .await
    .context("updating user info")?;
    Ok(())
}

pub async fn update_pass(db: &PgPool, username: &str, hash: &str) -> Result<()> {
    sqlx::query("UPDATE users SET pass = $2 WHERE username = $1")
        .bind(username)
        .bind(hash)
        .execute(db)
        .await
        .context("updating user password")?;
    Ok(())
}

pub async fn set_avatar(db: &PgPool, username: &str, avatar: Option<&str>) -> Result<()> {
    sqlx::query("UPDATE users SET avatar = $2 WHERE username = $1")
        .bind(username)
        .bind(avatar)
        .execute(db)
        .await
        .context("updating user avatar")?;
    Ok(())
}
