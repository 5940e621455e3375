//! cellport library - commands and shared options of the CLI
//!
//! Exposed as a library so the commands can be exercised from tests.

pub mod commands;
pub mod common;

pub use cellport_config as config_manager;
pub use cellport_logger as logger;
pub use common::GlobalOpts;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding a `tracing` filter for the library crates
pub const LOG_ENV_VAR: &str = "CELLPORT_LOG";

/// Route `tracing` events of the library crates to stderr
pub fn init_tracing(verbosity: u8) {
    let filter = tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
        .unwrap_or_else(|_| logger::tracing_directive(verbosity).into());
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .compact()
                .with_writer(std::io::stderr),
        )
        .try_init();
}
