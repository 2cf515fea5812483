//! Explicit validation, one function per input shape.
//!
//! Each check returns `Ok(())` or a `BadRequest` with a field-level message,
//! mirroring the field constraints enforced by the persistence schema.

use url::Url;

use crate::error::ApiError;

pub const USERNAME_MIN: usize = 4;
pub const USERNAME_MAX: usize = 20;
pub const PASSWORD_MIN: usize = 8;
pub const PASSWORD_MAX: usize = 20;
pub const NAME_MAX: usize = 35;
pub const EMAIL_MAX: usize = 320;
pub const CAPTION_MAX: usize = 100;
pub const COMPONENT_MAX: usize = 12;

fn bad(msg: impl Into<String>) -> ApiError {
    ApiError::BadRequest(msg.into())
}

pub fn validate_username(username: &str) -> Result<(), ApiError> {
    let len = username.chars().count();
    if !(USERNAME_MIN..=USERNAME_MAX).contains(&len) {
        return Err(bad(format!(
            "Username must be {USERNAME_MIN}-{USERNAME_MAX} characters long."
        )));
    }
    Ok(())
}

/// Password policy: 8-20 characters containing a lowercase letter, an
/// uppercase letter, and a digit or symbol.
pub fn validate_password(pass: &str) -> Result<(), ApiError> {
    let len = pass.chars().count();
    if !(PASSWORD_MIN..=PASSWORD_MAX).contains(&len) {
        return Err(bad(format!(
            "Password must be {PASSWORD_MIN}-{PASSWORD_MAX} characters long."
        )));
    }
    let has_lower = pass.chars().any(|c| c.is_lowercase());
    let has_upper = pass.chars().any(|c| c.is_uppercase());
    let has_digit_or_symbol = pass.chars().any(|c| c.is_ascii_digit() || !c.is_alphanumeric());
    if !(has_lower && has_upper && has_digit_or_symbol) {
        return Err(bad("Password is breakable."));
    }
    Ok(())
}

pub fn validate_person_name(field: &str, value: &str) -> Result<(), ApiError> {
    if value.is_empty() || value.chars().count() > NAME_MAX {
        return Err(bad(format!(
            "{field} must be 1-{NAME_MAX} characters long."
        )));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), ApiError> {
    let plausible = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.')
        }
        None => false,
    };
    if !plausible || email.chars().count() > EMAIL_MAX {
        return Err(bad("Email address is not valid."));
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    pass: &str,
    name: &str,
    surname: &str,
    email: &str,
) -> Result<(), ApiError> {
    validate_username(username)?;
    validate_password(pass)?;
    validate_person_name("Name", name)?;
    validate_person_name("Surname", surname)?;
    validate_email(email)
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), ApiError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(bad("Latitude must be within [-90, 90]."));
    }
    if !lon.is_finite() || !(-180.0..=180.0).contains(&lon) {
        return Err(bad("Longitude must be within [-180, 180]."));
    }
    Ok(())
}

pub fn validate_caption(caption: Option<&str>) -> Result<(), ApiError> {
    if let Some(caption) = caption {
        if caption.chars().count() > CAPTION_MAX {
            return Err(bad(format!(
                "Caption must be at most {CAPTION_MAX} characters long."
            )));
        }
    }
    Ok(())
}

pub fn validate_limit(limit: i64) -> Result<(), ApiError> {
    if limit < 1 {
        return Err(bad("Limit must be a positive number."));
    }
    Ok(())
}

pub fn validate_action(kind: &str, component: &str, url: &str) -> Result<(), ApiError> {
    if !matches!(kind, "Click" | "Scroll" | "Input") {
        return Err(bad("Action type must be one of Click, Scroll, Input."));
    }
    if component.is_empty() || component.chars().count() > COMPONENT_MAX {
        return Err(bad(format!(
            "Component must be 1-{COMPONENT_MAX} characters long."
        )));
    }
    validate_url(url)
}

/// A URL is acceptable when it parses absolutely and carries a host.
pub fn validate_url(url: &str) -> Result<(), ApiError> {
    let ok = Url::parse(url).map(|u| u.has_host()).unwrap_or(false);
    if ok {
        Ok(())
    } else {
        Err(bad("URL is not valid."))
    }
}
