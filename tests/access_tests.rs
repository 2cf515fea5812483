use geotag_server::access::{assert_admin, assert_owner, is_admin};
use geotag_server::config::Config;
use geotag_server::error::ApiError;
use geotag_server::http::auth::AuthUser;

fn test_config() -> Config {
    Config {
        database_url: "postgres://localhost/geotag".into(),
        server_addr: "127.0.0.1:8080".into(),
        jwt_secret: "secret".into(),
        jwt_expiration: 3600,
        superuser: "admin".into(),
        superuser_pass: "$2b$09$hashhashhashhashhashha".into(),
        upload_dir: "uploads".into(),
        max_avatar_bytes: 15_000,
    }
}

fn plain_user(username: &str) -> AuthUser {
    AuthUser {
        username: username.into(),
        pass: None,
    }
}

#[test]
fn owner_matches_by_username_equality() {
    let alice = plain_user("alice");
    assert!(assert_owner(&alice, "alice", "unauthorized").is_ok());
}

#[test]
fn owner_mismatch_is_unauthorized_with_message() {
    let bob = plain_user("bob");
    let err = assert_owner(&bob, "alice", "Unauthorized deletion attempt of the L location.")
        .unwrap_err();
    match err {
        ApiError::Unauthorized(msg) => {
            assert!(msg.contains("Unauthorized deletion attempt"))
        }
        other => panic!("expected Unauthorized, got {other:?}"),
    }
}

#[test]
fn admin_requires_the_full_credential_pair() {
    let config = test_config();

    // Homologated superuser identity: username plus configured secret.
    let admin = AuthUser {
        username: "admin".into(),
        pass: Some(config.superuser_pass.clone()),
    };
    assert!(is_admin(&admin, &config));
    assert!(assert_admin(&admin, &config).is_ok());
}

#[test]
fn username_alone_does_not_grant_admin() {
    let config = test_config();
    let impostor = plain_user("admin");
    assert!(!is_admin(&impostor, &config));
    assert!(matches!(
        assert_admin(&impostor, &config).unwrap_err(),
        ApiError::Unauthorized(_)
    ));
}

#[test]
fn ordinary_user_is_never_admin() {
    let config = test_config();
    let alice = plain_user("alice");
    assert!(!is_admin(&alice, &config));
}
