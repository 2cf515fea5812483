pub mod action_repo;
pub mod guess_repo;
pub mod location_repo;
pub mod models;
pub mod user_repo;
