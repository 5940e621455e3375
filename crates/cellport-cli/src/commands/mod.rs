pub mod app;
pub mod config;
pub mod config_export;
pub mod schema;
