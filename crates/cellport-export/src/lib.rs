//! Cellport export engine
//!
//! Reads a running application-server cell through the collaborator traits in
//! [`admin`] and produces the manifests defined in `cellport-manifest`:
//! - [`config_export`]: schema-driven export of configuration object trees
//! - [`task`]: normalization of column-oriented deployment tasks
//! - [`processors`]: per-task transforms into manifest options
//! - [`assembler`]: the application manifest of one deployed application
//!
//! [`snapshot`] provides every collaborator over a JSON document.

pub mod admin;
pub mod assembler;
pub mod config_export;
pub mod diagnostics;
pub mod errors;
pub mod processors;
pub mod schema;
pub mod snapshot;
pub mod task;

pub use assembler::{ManifestAccumulator, ManifestAssembler};
pub use config_export::ConfigExporter;
pub use diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, TracingSink};
pub use errors::{ExportError, ProviderError};
pub use processors::{ProcessorEntry, ProcessorOptions, ProcessorRegistry};
pub use schema::{ExportSchema, ExportSchemaEntry};
pub use snapshot::{Snapshot, SnapshotObject};
pub use task::Task;
