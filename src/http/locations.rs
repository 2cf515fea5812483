//! Geotagged locations and the guesses made on them.

use actix_files::NamedFile;
use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{delete, get, patch, post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::access;
use crate::config::Config;
use crate::db::guess_repo::{self, GuessFilter, ResultOrder};
use crate::db::location_repo;
use crate::db::models::Location;
use crate::error::ApiError;
use crate::http::auth::AuthUser;
use crate::storage;
use crate::validate;

//////////////////////////////////////////////////
// Requests
//////////////////////////////////////////////////

#[derive(MultipartForm)]
pub struct LocationCreateForm {
    pub lat: Text<String>,
    pub lon: Text<String>,
    pub caption: Option<Text<String>>,
    pub image: TempFile,
}

#[derive(MultipartForm)]
pub struct LocationEditForm {
    pub caption: Option<Text<String>>,
    pub image: TempFile,
}

#[derive(Deserialize)]
pub struct GuessReq {
    pub result: i64,
}

#[derive(Deserialize)]
pub struct LocationsFilterParams {
    pub limit: i64,
    pub user: Option<String>,
}

#[derive(Deserialize)]
pub struct GuessesFilterParams {
    pub limit: i64,
    pub id: Option<Uuid>,
    /// `1` selects ascending (best-first); anything else descending.
    pub results: Option<i64>,
}

fn parse_coordinate(raw: &str, field: &str) -> Result<f64, ApiError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|_| ApiError::BadRequest(format!("{field} must be a number.")))
}

async fn load_location(db: &PgPool, id: Uuid) -> Result<Location, ApiError> {
    location_repo::find_by_id(db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Location {id} was not found.")))
}

//////////////////////////////////////////////////
// POST /locations
//////////////////////////////////////////////////
#[post("/locations")]
pub async fn create_location(
    user: AuthUser,
    MultipartForm(form): MultipartForm<LocationCreateForm>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let lat = parse_coordinate(&form.lat, "Latitude")?;
    let lon = parse_coordinate(&form.lon, "Longitude")?;
    validate::validate_coordinates(lat, lon)?;
    let caption = form.caption.as_ref().map(|c| c.0.as_str());
    validate::validate_caption(caption)?;
    storage::require_mime(&form.image, "image/jpeg")?;

    let filename = storage::persist_upload(&form.image, &config.upload_dir)?;

    // No orphaned upload survives a failed record.
    let id = match location_repo::insert_location(
        &db,
        lat,
        lon,
        &filename,
        caption,
        &user.username,
    )
    .await
    {
        Ok(id) => id,
        Err(err) => {
            storage::remove_upload(&config.upload_dir, &filename)?;
            return Err(err.into());
        }
    };

    log::info!("location {id} created");
    Ok(HttpResponse::Created().finish())
}

//////////////////////////////////////////////////
// POST /locations/guess/{id}
//////////////////////////////////////////////////
#[post("/locations/guess/{id}")]
pub async fn guess_location(
    user: AuthUser,
    path: web::Path<Uuid>,
    info: web::Json<GuessReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let location = load_location(&db, path.into_inner()).await?;

    let guess_id =
        guess_repo::insert_guess(&db, &user.username, location.id, info.result).await?;

    log::info!("guess {guess_id} created");
    Ok(HttpResponse::Created().finish())
}

//////////////////////////////////////////////////
// GET /locations   (public)
//////////////////////////////////////////////////
#[get("/locations")]
pub async fn select_locations(
    web::Query(params): web::Query<LocationsFilterParams>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_limit(params.limit)?;

    let locations = location_repo::list(&db, params.limit, params.user.as_deref()).await?;
    log::info!("{} location record/s read", locations.len());
    Ok(HttpResponse::Ok().json(locations))
}

//////////////////////////////////////////////////
// GET /locations/rand
//////////////////////////////////////////////////
#[get("/locations/rand")]
pub async fn select_rand_location(
    _user: AuthUser,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let location = location_repo::find_random(&db)
        .await?
        .ok_or_else(|| ApiError::NotFound("No locations exist yet.".to_string()))?;
    Ok(HttpResponse::Ok().json(location))
}

//////////////////////////////////////////////////
// GET /locations/image/{filename}   (public)
//////////////////////////////////////////////////
#[get("/locations/image/{filename}")]
pub async fn stream_image(
    path: web::Path<String>,
    config: web::Data<Config>,
) -> Result<NamedFile, ApiError> {
    let filename = path.into_inner();
    let filename = storage::sanitize_filename(&filename)?;
    let file = NamedFile::open(storage::upload_path(&config.upload_dir, filename))?;
    Ok(file.set_content_type(mime::IMAGE_JPEG))
}

//////////////////////////////////////////////////
// GET /locations/guesses
//////////////////////////////////////////////////
#[get("/locations/guesses")]
pub async fn select_guesses(
    _user: AuthUser,
    web::Query(params): web::Query<GuessesFilterParams>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_limit(params.limit)?;

    // Filtering by location requires the location to exist.
    if let Some(id) = params.id {
        load_location(&db, id).await?;
    }

    let filter = GuessFilter {
        limit: params.limit,
        location_id: params.id,
        guesser: None,
        // Location-scoped listings are always best-first.
        order: ResultOrder::Asc,
    };
    let guesses = guess_repo::list(&db, &filter).await?;
    log::info!("{} guess record/s read", guesses.len());
    Ok(HttpResponse::Ok().json(guesses))
}

//////////////////////////////////////////////////
// GET /locations/guesses/me
//////////////////////////////////////////////////
#[get("/locations/guesses/me")]
pub async fn select_personal_guesses(
    user: AuthUser,
    web::Query(params): web::Query<GuessesFilterParams>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_limit(params.limit)?;

    let filter = GuessFilter {
        limit: params.limit,
        location_id: None,
        guesser: Some(user.username.clone()),
        order: ResultOrder::from_flag(params.results.unwrap_or(0)),
    };
    let guesses = guess_repo::list(&db, &filter).await?;
    log::info!("{} guess record/s read", guesses.len());
    Ok(HttpResponse::Ok().json(guesses))
}

//////////////////////////////////////////////////
// GET /locations/guess/{id}
//////////////////////////////////////////////////
#[get("/locations/guess/{id}")]
pub async fn select_guess(
    _user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let guess = guess_repo::find_by_id(&db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Guess {id} was not found.")))?;
    Ok(HttpResponse::Ok().json(guess))
}

//////////////////////////////////////////////////
// GET /locations/{id}/guessed-on
//////////////////////////////////////////////////
#[get("/locations/{id}/guessed-on")]
pub async fn guessed_location(
    user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let location = load_location(&db, path.into_inner()).await?;

    let body = match guess_repo::find_user_guess(&db, &user.username, location.id).await? {
        Some(guess_id) => serde_json::json!(guess_id),
        None => serde_json::json!(false),
    };
    Ok(HttpResponse::Ok().json(body))
}

//////////////////////////////////////////////////
// GET /locations/{id}
//////////////////////////////////////////////////
#[get("/locations/{id}")]
pub async fn select_location(
    _user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    let location = load_location(&db, path.into_inner()).await?;
    Ok(HttpResponse::Ok().json(location))
}

//////////////////////////////////////////////////
// PATCH /locations/{id}
//////////////////////////////////////////////////
#[patch("/locations/{id}")]
pub async fn edit_location(
    user: AuthUser,
    path: web::Path<Uuid>,
    MultipartForm(form): MultipartForm<LocationEditForm>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let caption = form.caption.as_ref().map(|c| c.0.as_str());
    validate::validate_caption(caption)?;
    storage::require_mime(&form.image, "image/jpeg")?;

    let filename = storage::persist_upload(&form.image, &config.upload_dir)?;
    let id = path.into_inner();

    // The old image goes away only once the replacement is confirmed to apply
    // to a record the caller owns; otherwise the replacement itself goes away.
    let location = match location_repo::find_by_id(&db, id).await {
        Ok(Some(location)) => location,
        Ok(None) => {
            storage::remove_upload(&config.upload_dir, &filename)?;
            return Err(ApiError::NotFound(format!("Location {id} was not found.")));
        }
        Err(err) => {
            storage::remove_upload(&config.upload_dir, &filename)?;
            return Err(err.into());
        }
    };

    if let Err(err) = access::assert_owner(
        &user,
        &location.username,
        &format!("Unauthorized edit attempt of the {id} location."),
    ) {
        storage::remove_upload(&config.upload_dir, &filename)?;
        return Err(err);
    }

    storage::remove_upload(&config.upload_dir, &location.image)?;
    location_repo::update_image_caption(&db, id, &filename, caption).await?;

    log::info!("location {id} updated");
    Ok(HttpResponse::Ok().finish())
}

//////////////////////////////////////////////////
// DELETE /locations/{id}
//////////////////////////////////////////////////
#[delete("/locations/{id}")]
pub async fn remove_location(
    user: AuthUser,
    path: web::Path<Uuid>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let id = path.into_inner();
    let location = load_location(&db, id).await?;

    access::assert_owner(
        &user,
        &location.username,
        &format!("Unauthorized deletion attempt of the {id} location."),
    )?;

    // Guesses are protected from losing their target.
    if guess_repo::count_for_location(&db, id).await? != 0 {
        return Err(ApiError::Conflict(format!(
            "Cannot delete location {id} due to guesses made."
        )));
    }

    location_repo::delete(&db, id).await?;
    storage::remove_upload(&config.upload_dir, &location.image)?;

    log::info!("location {id} deleted");
    Ok(HttpResponse::Ok().finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    // Literal segments are registered ahead of the `{id}` patterns.
    cfg.service(create_location)
        .service(guess_location)
        .service(select_locations)
        .service(select_rand_location)
        .service(stream_image)
        .service(select_guesses)
        .service(select_personal_guesses)
        .service(select_guess)
        .service(guessed_location)
        .service(select_location)
        .service(edit_location)
        .service(remove_location);
}
