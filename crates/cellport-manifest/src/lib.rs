//! Cellport manifest model
//!
//! This crate holds the in-memory manifest values produced by the export engine
//! and the writer that renders them to the indented text format used for diffing
//! and re-import.
//!
//! Two kinds of manifest exist:
//! - [`ApplicationManifest`]: deployment options and extra metadata of one application
//! - [`ManifestObjectNode`]: a projected tree of configuration objects

pub mod errors;
pub mod manifest;
pub mod manifest_writer;
pub mod types;

pub use errors::ManifestError;
pub use types::{ApplicationManifest, AttributeNodeValue, ManifestObjectNode, OptionValue, Row};

// Re-export writer entry points used by the CLI
pub use manifest_writer::{render_application, render_config, render_json, write_to_path};
