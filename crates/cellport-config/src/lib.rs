//! Cellport configuration
//!
//! User settings live in a small TOML file, `~/.config/cellport/cellport.toml`
//! by default. `CELLPORT_CONFIG` points the CLI at another file, which is how
//! the integration tests run against an isolated configuration.

pub mod config;
pub mod errors;

pub use config::{Config, CONFIG_ENV_VAR, KEYS};
pub use errors::ConfigError;
