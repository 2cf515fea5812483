//! UI telemetry log (append, admin list, admin bulk delete).

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::access;
use crate::config::Config;
use crate::db::action_repo;
use crate::error::ApiError;
use crate::http::auth::AuthUser;
use crate::validate;

#[derive(Deserialize)]
pub struct ActionRecordReq {
    #[serde(rename = "type")]
    pub kind: String,
    pub component: String,
    pub value: Option<String>,
    pub url: String,
}

#[derive(Deserialize)]
pub struct ActionsFilterParams {
    pub limit: i64,
    #[serde(default)]
    pub search: String,
}

#[derive(Deserialize)]
pub struct ActionsRemoveReq {
    pub actions: Vec<Uuid>,
}

//////////////////////////////////////////////////
// POST /actions
//////////////////////////////////////////////////
#[post("/actions")]
pub async fn record_action(
    user: AuthUser,
    info: web::Json<ActionRecordReq>,
    db: web::Data<PgPool>,
) -> Result<HttpResponse, ApiError> {
    validate::validate_action(&info.kind, &info.component, &info.url)?;

    let id = action_repo::insert_action(
        &db,
        &info.kind,
        &info.component,
        info.value.as_deref(),
        &info.url,
        &user.username,
    )
    .await?;

    log::info!("action {id} created");
    Ok(HttpResponse::Created().finish())
}

//////////////////////////////////////////////////
// GET /actions   (admin)
//////////////////////////////////////////////////
#[get("/actions")]
pub async fn select_actions(
    user: AuthUser,
    web::Query(params): web::Query<ActionsFilterParams>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    access::assert_admin(&user, &config)?;
    validate::validate_limit(params.limit)?;

    let actions = action_repo::list(&db, params.limit, &params.search).await?;
    log::info!("{} action record/s read", actions.len());
    Ok(HttpResponse::Ok().json(actions))
}

//////////////////////////////////////////////////
// DELETE /actions   (admin)
//////////////////////////////////////////////////
#[delete("/actions")]
pub async fn remove_actions(
    user: AuthUser,
    info: web::Json<ActionsRemoveReq>,
    db: web::Data<PgPool>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    access::assert_admin(&user, &config)?;

    // Empty id list is a no-op.
    if info.actions.is_empty() {
        return Ok(HttpResponse::Ok().finish());
    }

    let deleted = action_repo::delete_by_ids(&db, &info.actions).await?;
    log::info!("{deleted} action record/s deleted");

    if deleted == 0 {
        return Err(ApiError::NotFound(format!(
            "None among actions {:?} were deleted.",
            info.actions
        )));
    }
    Ok(HttpResponse::Ok().finish())
}

//////////////////////////////////////////////////
// Mount
//////////////////////////////////////////////////
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(record_action)
        .service(select_actions)
        .service(remove_actions);
}
