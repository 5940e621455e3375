use crate::admin::Converter;
use thiserror::Error;

/// Errors that abort an export pass
///
/// Every variant carries the type, attribute or task it was raised for so a
/// failed export can be traced back to the offending source data.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Schema mismatch in {context}: {message}")]
    SchemaMismatch { context: String, message: String },

    #[error("Cannot convert {value} in {context} with the {converter} converter")]
    Conversion {
        context: String,
        converter: Converter,
        value: String,
    },

    #[error("Source query failed for {context}: {message}")]
    Source { context: String, message: String },

    #[error("Failed to parse snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("Failed to parse export schema: {0}")]
    SchemaParse(#[from] toml::de::Error),

    #[error("Failed to serialize export schema: {0}")]
    SchemaSerialize(#[from] toml::ser::Error),
}

impl ExportError {
    pub fn schema_mismatch(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::SchemaMismatch {
            context: context.into(),
            message: message.into(),
        }
    }

    pub fn query_failed(context: impl Into<String>, message: impl Into<String>) -> Self {
        ExportError::Source {
            context: context.into(),
            message: message.into(),
        }
    }
}

/// Failure of an optional metadata provider
///
/// The assembler never propagates these; the block is left out of the manifest.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProviderError {
    #[error("not supported in this environment")]
    Unsupported,

    #[error("provider failed: {0}")]
    Failed(String),
}
