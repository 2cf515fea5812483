use crate::http;
use actix_web::web;

/// Mount every HTTP sub-module.
pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(http::auth::init_routes)
        .configure(http::locations::init_routes)
        .configure(http::actions::init_routes)
        .configure(http::health::init_routes);
}
