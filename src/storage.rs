//! Upload storage: image/avatar files on local disk.
//!
//! Files are keyed `<upload-millis>_<original-filename>` inside the
//! configured upload directory. An upload goes through
//! uploaded -> validated -> committed, and is unlinked on any failed step so
//! no orphaned file survives a failed record. A failed unlink itself is an
//! Internal error, which can mask the failure that triggered the cleanup.

use std::path::{Path, PathBuf};

use actix_multipart::form::tempfile::TempFile;
use chrono::Utc;

use crate::error::ApiError;

/// Builds the on-disk name for an incoming upload.
pub fn make_filename(original: &str, millis: i64) -> String {
    format!("{millis}_{original}")
}

/// Rejects client-supplied filenames that could escape the upload directory.
pub fn sanitize_filename(filename: &str) -> Result<&str, ApiError> {
    if filename.is_empty()
        || filename.contains('/')
        || filename.contains('\\')
        || filename.contains("..")
    {
        return Err(ApiError::BadRequest("Invalid filename.".to_string()));
    }
    Ok(filename)
}

pub fn upload_path(upload_dir: &str, filename: &str) -> PathBuf {
    Path::new(upload_dir).join(filename)
}

/// Moves a validated multipart temp file into the upload directory and
/// returns its stored filename.
pub fn persist_upload(file: &TempFile, upload_dir: &str) -> Result<String, ApiError> {
    let original = file
        .file_name
        .as_deref()
        .ok_or_else(|| ApiError::BadRequest("Upload is missing a filename.".to_string()))?;
    let original = sanitize_filename(original)?;

    let filename = make_filename(original, Utc::now().timestamp_millis());
    let dest = upload_path(upload_dir, &filename);

    // Copy rather than rename: the temp dir may sit on another filesystem.
    std::fs::copy(file.file.path(), &dest)?;
    Ok(filename)
}

/// Unlinks a stored upload. Failures surface to the caller.
pub fn remove_upload(upload_dir: &str, filename: &str) -> Result<(), ApiError> {
    std::fs::remove_file(upload_path(upload_dir, filename))?;
    Ok(())
}

/// Checks the declared MIME type of an upload against the single type the
/// endpoint accepts.
pub fn require_mime(file: &TempFile, expected: &str) -> Result<(), ApiError> {
    let matches = file
        .content_type
        .as_ref()
        .map(|m| m.essence_str() == expected)
        .unwrap_or(false);
    if matches {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "File is not of {expected} MIME type."
        )))
    }
}

pub fn require_max_size(file: &TempFile, max_bytes: usize) -> Result<(), ApiError> {
    if file.size > max_bytes {
        return Err(ApiError::BadRequest(format!(
            "File exceeds the {max_bytes} byte limit."
        )));
    }
    Ok(())
}
