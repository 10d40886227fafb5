pub mod api;
pub mod cache;
pub mod config;
pub mod models;
pub mod reports;
pub mod source;
