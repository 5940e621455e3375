//! Manifest value types
//!
//! Both manifest kinds keep their maps in insertion order: the order in which
//! the exporter discovered an entry is the order a writer must emit it in.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One row of a manifest table, fields are joined with `;` when rendered
pub type Row = Vec<String>;

// =============================================================================
// APPLICATION MANIFEST
// =============================================================================

/// Value of an application option or extra: a plain string or a table of rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Scalar(String),
    Table(Vec<Row>),
}

impl OptionValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            OptionValue::Scalar(value) => Some(value),
            OptionValue::Table(_) => None,
        }
    }

    pub fn as_table(&self) -> Option<&[Row]> {
        match self {
            OptionValue::Table(rows) => Some(rows),
            OptionValue::Scalar(_) => None,
        }
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::Scalar(value)
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::Scalar(value.to_string())
    }
}

impl From<Vec<Row>> for OptionValue {
    fn from(rows: Vec<Row>) -> Self {
        OptionValue::Table(rows)
    }
}

/// Exported deployment options of a single application
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationManifest {
    pub app_name: String,
    /// Artifact location relative to the manifest, resolved by the importer
    pub artifact_path: String,
    #[serde(default)]
    pub options: IndexMap<String, OptionValue>,
    #[serde(default)]
    pub extras: IndexMap<String, OptionValue>,
}

// =============================================================================
// CONFIGURATION MANIFEST
// =============================================================================

/// Projected value of a configuration attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeNodeValue {
    Text(String),
    Object(Box<ManifestObjectNode>),
    List(Vec<ManifestObjectNode>),
}

/// A configuration object projected through the export schema
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestObjectNode {
    pub type_name: String,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub keys: IndexMap<String, String>,
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, AttributeNodeValue>,
    /// Emission order of `attributes`
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ordered_attribute_names: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<ManifestObjectNode>,
}
