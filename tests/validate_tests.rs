use geotag_server::error::ApiError;
use geotag_server::validate::*;

fn is_bad_request(err: ApiError) -> bool {
    matches!(err, ApiError::BadRequest(_))
}

#[test]
fn username_length_bounds() {
    assert!(validate_username("alice").is_ok());
    assert!(validate_username("abcd").is_ok());
    assert!(is_bad_request(validate_username("abc").unwrap_err()));
    assert!(is_bad_request(
        validate_username(&"a".repeat(21)).unwrap_err()
    ));
}

#[test]
fn password_policy_accepts_mixed_case_with_digit() {
    assert!(validate_password("Sup3rSecret").is_ok());
}

#[test]
fn password_policy_accepts_symbol_instead_of_digit() {
    assert!(validate_password("Super!Secret").is_ok());
}

#[test]
fn password_policy_rejects_weak_passwords() {
    // no uppercase
    assert!(is_bad_request(validate_password("sup3rsecret").unwrap_err()));
    // no lowercase
    assert!(is_bad_request(validate_password("SUP3RSECRET").unwrap_err()));
    // letters only
    assert!(is_bad_request(validate_password("SuperSecret").unwrap_err()));
    // too short
    assert!(is_bad_request(validate_password("Ab1!x").unwrap_err()));
}

#[test]
fn email_needs_local_part_and_dotted_domain() {
    assert!(validate_email("alice@example.com").is_ok());
    assert!(is_bad_request(validate_email("alice").unwrap_err()));
    assert!(is_bad_request(validate_email("@example.com").unwrap_err()));
    assert!(is_bad_request(validate_email("alice@nodot").unwrap_err()));
}

#[test]
fn coordinates_within_world_bounds() {
    assert!(validate_coordinates(46.056946, 14.505751).is_ok());
    assert!(validate_coordinates(-90.0, 180.0).is_ok());
    assert!(is_bad_request(
        validate_coordinates(90.000001, 0.0).unwrap_err()
    ));
    assert!(is_bad_request(
        validate_coordinates(0.0, -180.5).unwrap_err()
    ));
    assert!(is_bad_request(
        validate_coordinates(f64::NAN, 0.0).unwrap_err()
    ));
}

#[test]
fn caption_capped_at_hundred_chars() {
    assert!(validate_caption(None).is_ok());
    assert!(validate_caption(Some("a view from the castle hill")).is_ok());
    assert!(is_bad_request(
        validate_caption(Some(&"x".repeat(101))).unwrap_err()
    ));
}

#[test]
fn limits_must_be_positive() {
    assert!(validate_limit(1).is_ok());
    assert!(validate_limit(100).is_ok());
    assert!(is_bad_request(validate_limit(0).unwrap_err()));
    assert!(is_bad_request(validate_limit(-3).unwrap_err()));
}

#[test]
fn action_type_is_a_closed_enumeration() {
    assert!(validate_action("Click", "navbar", "https://example.com/play").is_ok());
    assert!(validate_action("Scroll", "feed", "https://example.com/").is_ok());
    assert!(validate_action("Input", "search-box", "https://example.com/q").is_ok());
    assert!(is_bad_request(
        validate_action("Hover", "navbar", "https://example.com/").unwrap_err()
    ));
}

#[test]
fn action_component_capped_at_twelve_chars() {
    assert!(is_bad_request(
        validate_action("Click", "a-rather-long-component", "https://example.com/").unwrap_err()
    ));
    assert!(is_bad_request(
        validate_action("Click", "", "https://example.com/").unwrap_err()
    ));
}

#[test]
fn urls_need_a_scheme() {
    assert!(validate_url("https://example.com/page").is_ok());
    assert!(is_bad_request(validate_url("example.com/page").unwrap_err()));
    assert!(is_bad_request(validate_url("://missing").unwrap_err()));
}

#[test]
fn urls_need_a_host() {
    // host-less absolute URL
    assert!(is_bad_request(validate_url("https:///path").unwrap_err()));
    // whitespace inside the host
    assert!(is_bad_request(
        validate_url("https://exa mple.com/x").unwrap_err()
    ));
    // scheme-only forms carry no host either
    assert!(is_bad_request(
        validate_url("mailto:alice@example.com").unwrap_err()
    ));
}
