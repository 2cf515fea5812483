use geotag_server::error::ApiError;
use geotag_server::storage::{make_filename, sanitize_filename, upload_path};

#[test]
fn upload_names_are_keyed_by_timestamp_and_original() {
    assert_eq!(
        make_filename("castle.jpeg", 1_724_943_600_000),
        "1724943600000_castle.jpeg"
    );
}

#[test]
fn distinct_timestamps_give_distinct_names() {
    let a = make_filename("castle.jpeg", 1);
    let b = make_filename("castle.jpeg", 2);
    assert_ne!(a, b);
}

#[test]
fn sane_filenames_pass_through() {
    assert_eq!(
        sanitize_filename("1724943600000_castle.jpeg").unwrap(),
        "1724943600000_castle.jpeg"
    );
}

#[test]
fn traversal_attempts_are_rejected() {
    for name in ["../etc/passwd", "a/b.png", "a\\b.png", "..", ""] {
        assert!(
            matches!(sanitize_filename(name), Err(ApiError::BadRequest(_))),
            "{name:?} should be rejected"
        );
    }
}

#[test]
fn upload_path_joins_under_the_upload_dir() {
    let path = upload_path("uploads", "1_castle.jpeg");
    assert_eq!(path, std::path::Path::new("uploads").join("1_castle.jpeg"));
}
