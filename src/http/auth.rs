//! Account management and bearer-token (JWT) authentication.

use actix_files::NamedFile;
use actix_multipart::form::{tempfile::TempFile, MultipartForm};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

use crate::access;
use crate::config::Config;
use crate::db::models::User;
use crate::db::user_repo;
use crate::error::ApiError;
use crate::storage;
use crate::validate;

const BCRYPT_COST: u32 = 9;

//////////////////////////////////////////////////
// Data structs
//////////////////////////////////////////////////

#[derive(Deserialize)]
pub struct RegisterReq {
    pub username: String,
    pub pass: String,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct CredentialsReq {
    pub username: String,
    pub pass: String,
}

#[derive(Deserialize)]
pub struct InfoEditReq {
    pub username: String,
    pub name: String,
    pub surname: String,
    pub email: String,
}

#[derive(Deserialize)]
pub struct PassChangeReq {
    pub pass: String,
    #[serde(rename = "newPass")]
    pub new_pass: String,
}

#[derive(Deserialize)]
pub struct UserSearchParams {
    #[serde(default)]
    pub search: String,
}

#[derive(Deserialize)]
pub struct AvatarStreamParams {
    pub avatar: String,
}

#[derive(MultipartForm)]
pub struct AvatarForm {
    pub avatar: TempFile,
}

#[derive(Serialize)]
pub struct JwtResponse {
    pub jwt: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String, // username
    exp: usize,
}

//////////////////////////////////////////////////
// ─────────────  AuthUser extractor  ─────────────
//////////////////////////////////////////////////

pub mod extractor {
    use super::Claims;
    use crate::config::Config;
    use actix_web::{
        dev::Payload, error::ErrorUnauthorized, web, FromRequest, HttpRequest,
        Result as ActixResult,
    };
    use futures_util::future::{ready, Ready};
    use jsonwebtoken::{decode, DecodingKey, Validation};

    /// Extracts and validates a Bearer-JWT, exposing the caller's username.
    ///
    /// The superuser identity is homologated from configuration: it carries
    /// the configured secret so the admin check can compare the full pair.
    #[derive(Debug, Clone)]
    pub struct AuthUser {
        pub username: String,
        pub pass: Option<String>,
    }

    impl FromRequest for AuthUser {
        type Error = actix_web::Error;
        type Future = Ready<ActixResult<Self, Self::Error>>;

        fn from_request(req: &HttpRequest, _pl: &mut Payload) -> Self::Future {
            let res = (|| {
                // Expect:  Authorization: Bearer <JWT>
                let hdr = req
                    .headers()
                    .get("Authorization")
                    .and_then(|v| v.to_str().ok())
                    .ok_or_else(|| ErrorUnauthorized("missing Authorization header"))?;

                let token = hdr
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| ErrorUnauthorized("malformed Authorization header"))?;

                let config = req
                    .app_data::<web::Data<Config>>()
                    .ok_or_else(|| ErrorUnauthorized("server mis-config"))?;

                let data = decode::<Claims>(
                    token,
                    &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
                    &Validation::default(),
                )
                .map_err(|_| ErrorUnauthorized("invalid / expired token"))?;

                let username = data.claims.sub;
                let pass = (username == config.superuser)
                    .then(|| config.superuser_pass.clone());

                Ok(AuthUser { username, pass })
            })();

            ready(res)
        }
    }
}
pub use extractor::AuthUser;

/// Signs an HS256 token carrying the username.
pub fn sign_jwt(username: &str, config: &Config) -> Result<String, ApiError> {
    let exp = Utc::now()
        .checked_add_signed(Duration::seconds(config.jwt_expiration))
        .ok_or_else(|| ApiError::Internal("token expiry overflow".to_string()))?
        .timestamp() as usize;
    let claims = Claims {
        sub: username.to_string(),
        exp,
    };
    let jwt = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.as_bytes()),
    )?;
    Ok(jwt)
}

async fn load_user(db: &PgPool, username: &str) -> Result<User, ApiError> {
    user_repo::find_by_username(db, username)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User {username} was not found.")))
}

//////////////////////////////////////////////////
// POST /auth/register
//////////////////////////////////////////////////
#[post("/auth/register")]
pub async fn register(
    info: web::Json<RegisterReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_registration(
        &info.username,
        &info.pass,
        &info.name,
        &info.surname,
        &info.email,
    )?;

    if user_repo::username_exists(&db, &info.username).await? {
        return Err(ApiError::Conflict(format!(
            "Username {} is already in use.",
            info.username
        )));
    }

    let hash = bcrypt::hash(&info.pass, BCRYPT_COST)?;
    let user = User {
        username: info.username.clone(),
        pass: hash,
        name: info.name.clone(),
        surname: info.surname.clone(),
        email: info.email.clone(),
        avatar: None,
    };
    user_repo::insert_user(&db, &user).await?;

    log::info!("user {} created", user.username);
    Ok(HttpResponse::Created().finish())
}

//////////////////////////////////////////////////
// POST /auth/login
//////////////////////////////////////////////////
#[post("/auth/login")]
pub async fn login(
    info: web::Json<CredentialsReq>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    // Registered user
    if let Some(user) = user_repo::find_by_username(&db, &info.username).await? {
        if bcrypt::verify(&info.pass, &user.pass)? {
            let jwt = sign_jwt(&user.username, &config)?;
            return Ok(HttpResponse::Ok().json(JwtResponse { jwt }));
        }
    }

    // Superuser login
    if info.username == config.superuser && bcrypt::verify(&info.pass, &config.superuser_pass)? {
        let jwt = sign_jwt(&config.superuser, &config)?;
        return Ok(HttpResponse::Ok().json(JwtResponse { jwt }));
    }

    Err(ApiError::Unauthorized("Check your credentials.".to_string()))
}

//////////////////////////////////////////////////
// GET /auth/users   (admin)
//////////////////////////////////////////////////
#[get("/auth/users")]
pub async fn select_users(
    user: AuthUser,
    web::Query(params): web::Query<UserSearchParams>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    access::assert_admin(&user, &config)?;

    let users = user_repo::search_users(&db, &params.search).await?;
    log::info!("{} user record/s read", users.len());
    Ok(HttpResponse::Ok().json(users))
}

//////////////////////////////////////////////////
// GET /auth/me/info
//////////////////////////////////////////////////
#[get("/auth/me/info")]
pub async fn select_info(
    user: AuthUser,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    // Superuser has no users row.
    if user.pass.is_some() {
        return Ok(HttpResponse::Ok().json(serde_json::json!({ "username": user.username })));
    }
    let record = load_user(&db, &user.username).await?;
    Ok(HttpResponse::Ok().json(record))
}

//////////////////////////////////////////////////
// PATCH /auth/me/info
//////////////////////////////////////////////////
#[patch("/auth/me/info")]
pub async fn edit_info(
    user: AuthUser,
    info: web::Json<InfoEditReq>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_username(&info.username)?;
    validate::validate_person_name("Name", &info.name)?;
    validate::validate_person_name("Surname", &info.surname)?;
    validate::validate_email(&info.email)?;

    let mut taken = false;
    if info.username != user.username {
        taken = user_repo::username_exists(&db, &info.username).await?;
    }

    // When the requested username is taken the remaining fields still apply
    // and the call ends in Conflict.
    let effective = if taken { &user.username } else { &info.username };
    user_repo::update_info(
        &db,
        &user.username,
        effective,
        &info.name,
        &info.surname,
        &info.email,
    )
    .await?;

    log::info!("user {effective} updated");

    if taken {
        return Err(ApiError::Conflict(format!(
            "Username {} is already in use.",
            info.username
        )));
    }

    let jwt = sign_jwt(effective, &config)?;
    Ok(HttpResponse::Ok().json(JwtResponse { jwt }))
}

//////////////////////////////////////////////////
// PATCH /auth/me/pass
//////////////////////////////////////////////////
#[patch("/auth/me/pass")]
pub async fn change_pass(
    user: AuthUser,
    info: web::Json<PassChangeReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_password(&info.new_pass)?;

    let record = load_user(&db, &user.username).await?;
    if !bcrypt::verify(&info.pass, &record.pass)? {
        return Err(ApiError::Conflict("Invalid current password.".to_string()));
    }

    let hash = bcrypt::hash(&info.new_pass, BCRYPT_COST)?;
    user_repo::update_pass(&db, &user.username, &hash).await?;

    log::info!("user {} updated", user.username);
    Ok(HttpResponse::Ok().finish())
}

//////////////////////////////////////////////////
// PATCH /auth/me/avatar
//////////////////////////////////////////////////
#[patch("/auth/me/avatar")]
pub async fn upload_avatar(
    user: AuthUser,
    MultipartForm(form): MultipartForm<AvatarForm>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    storage::require_mime(&form.avatar, "image/png")?;
    storage::require_max_size(&form.avatar, config.max_avatar_bytes)?;

    let filename = storage::persist_upload(&form.avatar, &config.upload_dir)?;

    let record = load_user(&db, &user.username).await?;
    if record.avatar.is_some() {
        storage::remove_upload(&config.upload_dir, &filename)?;
        return Err(ApiError::Conflict(
            "Avatar has already been uploaded.".to_string(),
        ));
    }

    user_repo::set_avatar(&db, &user.username, Some(&filename)).await?;

    log::info!("user {} updated", user.username);
    Ok(HttpResponse::Ok().json(serde_json::json!({ "filename": filename })))
}

//////////////////////////////////////////////////
// GET /auth/me/avatar
//////////////////////////////////////////////////
#[get("/auth/me/avatar")]
pub async fn stream_avatar(
    _user: AuthUser,
    web::Query(params): web::Query<AvatarStreamParams>,
    config: web::Data<Config>,
) -> Result<NamedFile, ApiError> {
    let filename = storage::sanitize_filename(&params.avatar)?;
    let file = NamedFile::open(storage::upload_path(&config.upload_dir, filename))?;
    Ok(file.set_content_type(mime::IMAGE_PNG))
}

//////////////////////////////////////////////////
// DELETE /auth/me/avatar
//////////////////////////////////////////////////
#[delete("/auth/me/avatar")]
pub async fn remove_avatar(
    user: AuthUser,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let record = load_user(&db, &user.username).await?;
    let avatar = record
        .avatar
        .ok_or_else(|| ApiError::NotFound("No avatar has been uploaded.".to_string()))?;

    storage::remove_upload(&config.upload_dir, &avatar)?;
    user_repo::set_avatar(&db, &user.username, None).await?;

    log::info!("user {} updated", user.username);
    Ok(HttpResponse::Ok().finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(register)
        .service(login)
        .service(select_users)
        .service(select_info)
        .service(edit_info)
        .service(change_pass)
        .service(upload_avatar)
        .service(stream_avatar)
        .service(remove_avatar);
}
