//! Runtime configuration for the geotag server.
//!
//! Built once from the environment in `main` and handed to the app via
//! `web::Data<Config>`; nothing reads the environment after startup.

use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    /// Postgres connection string.
    pub database_url: String,
    /// Listen address, e.g. `127.0.0.1:8080`.
    pub server_addr: String,
    /// HS256 secret for signing and verifying bearer tokens.
    pub jwt_secret: String,
    /// Access-token lifetime (seconds).
    pub jwt_expiration: i64,
    /// Superuser username; grants the admin endpoints.
    pub superuser: String,
    /// Bcrypt hash of the superuser password.
    pub superuser_pass: String,
    /// Directory receiving uploaded images and avatars.
    pub upload_dir: String,
    /// Hard cap on avatar size (bytes).
    pub max_avatar_bytes: usize,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL")?;
        let jwt_secret = env::var("JWT_SECRET")?;
        let superuser = env::var("SUPERUSER")?;
        let superuser_pass = env::var("SUPERUSER_PASS")?;

        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".into());
        let jwt_expiration = env::var("JWT_EXPIRATION")
            .ok()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(3_600);
        let upload_dir = env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".into());
        let max_avatar_bytes = env::var("MAX_AVATAR_BYTES")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .unwrap_or(15_000);

        Ok(Config {
            database_url,
            server_addr,
            jwt_secret,
            jwt_expiration,
            superuser,
            superuser_pass,
            upload_dir,
            max_avatar_bytes,
        })
    }
}
