use actix_web::http::StatusCode;
use actix_web::ResponseError;
use geotag_server::error::ApiError;

#[test]
fn taxonomy_maps_to_http_statuses() {
    let cases = [
        (
            ApiError::NotFound("Location L was not found.".into()),
            StatusCode::NOT_FOUND,
        ),
        (
            ApiError::Unauthorized("Unauthorized edit attempt of the L location.".into()),
            StatusCode::UNAUTHORIZED,
        ),
        (
            ApiError::Conflict("Username alice is already in use.".into()),
            StatusCode::CONFLICT,
        ),
        (
            ApiError::BadRequest("Limit must be a positive number.".into()),
            StatusCode::BAD_REQUEST,
        ),
        (
            ApiError::Internal("connection reset".into()),
            StatusCode::INTERNAL_SERVER_ERROR,
        ),
    ];
    for (err, status) in cases {
        assert_eq!(err.status_code(), status, "{err}");
    }
}

#[test]
fn messages_embed_the_offending_id() {
    let err = ApiError::NotFound("Location 7f0bd3cc was not found.".into());
    assert!(err.to_string().contains("7f0bd3cc"));
}

#[test]
fn persistence_failures_surface_as_internal_with_original_message() {
    let err: ApiError = sqlx::Error::PoolClosed.into();
    match &err {
        ApiError::Internal(msg) => assert!(!msg.is_empty()),
        other => panic!("expected Internal, got {other:?}"),
    }
    assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[test]
fn error_body_is_json_with_an_error_field() {
    let err = ApiError::Conflict("Cannot delete location L due to guesses made.".into());
    let resp = err.error_response();
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(content_type.starts_with("application/json"));
}
