//! Authorization predicates for write and admin-read paths.
//!
//! Ordinary users act on their own records; the configured superuser bypasses
//! ownership on the read/delete-all admin endpoints. Admin standing is an
//! equality check against two configuration values, not a role system.

use crate::config::Config;
use crate::error::ApiError;
use crate::http::auth::AuthUser;

/// Ownership check: acting username must equal the resource owner's username.
/// A mismatch is surfaced as Unauthorized, never silently filtered.
pub fn assert_owner(user: &AuthUser, owner: &str, attempt: &str) -> Result<(), ApiError> {
    if user.username == owner {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(attempt.to_string()))
    }
}

/// Admin check: the resolved identity must carry the configured superuser
/// username together with the configured superuser secret.
pub fn is_admin(user: &AuthUser, config: &Config) -> bool {
    user.username == config.superuser && user.pass.as_deref() == Some(&config.superuser_pass)
}

pub fn assert_admin(user: &AuthUser, config: &Config) -> Result<(), ApiError> {
    if is_admin(user, config) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(
            "Admin privileges are required.".to_string(),
        ))
    }
}
