pub mod access;
pub mod config;
pub mod db;
pub mod error;
pub mod http;
pub mod metrics;
pub mod storage;
pub mod validate;
