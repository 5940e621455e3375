//! Boundary to the administrative system
//!
//! The export engine only ever reads from the managed runtime. Everything it
//! needs is expressed by the traits in this module:
//! - [`TypeRegistry`]: attribute definitions and value converters per type
//! - [`ConfigObject`]: a live configuration object and its containment queries
//! - [`TaskSource`]: raw deployment task records of an application
//! - [`DeploymentMetadata`]: non-task deployment metadata, some of it optional
//!
//! [`crate::snapshot::Snapshot`] implements all of them over a JSON document.

use crate::errors::{ExportError, ProviderError};
use cellport_manifest::Row;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

// =============================================================================
// VALUES
// =============================================================================

/// A scalar attribute value as reported by the administrative system
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Text(text) => write!(f, "{}", text),
            ScalarValue::Integer(value) => write!(f, "{}", value),
            ScalarValue::Float(value) => write!(f, "{}", value),
            ScalarValue::Boolean(value) => write!(f, "{}", value),
        }
    }
}

/// An attribute value: scalar, nested object or list of either
#[derive(Debug, Clone)]
pub enum AttributeValue<O> {
    Scalar(ScalarValue),
    Object(O),
    List(Vec<AttributeValue<O>>),
}

/// All attributes of an object, in the order the source reports them
pub type AttributeMap<O> = IndexMap<String, AttributeValue<O>>;

// =============================================================================
// TYPE METADATA
// =============================================================================

/// Renders scalar values of a type into their external string form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Converter {
    Text,
    Integer,
    Boolean,
    Float,
    Enumeration,
}

impl Converter {
    /// Convert one scalar, `None` when the value does not fit the converter
    pub fn convert(&self, value: &ScalarValue) -> Option<String> {
        match (self, value) {
            (Converter::Text | Converter::Enumeration, value) => Some(value.to_string()),
            (Converter::Integer, ScalarValue::Integer(number)) => Some(number.to_string()),
            (Converter::Integer, ScalarValue::Text(text)) => {
                text.trim().parse::<i64>().ok().map(|n| n.to_string())
            }
            (Converter::Boolean, ScalarValue::Boolean(flag)) => Some(flag.to_string()),
            (Converter::Boolean, ScalarValue::Text(text)) => {
                match text.trim().to_ascii_lowercase().as_str() {
                    "true" => Some("true".to_string()),
                    "false" => Some("false".to_string()),
                    _ => None,
                }
            }
            (Converter::Float, ScalarValue::Float(number)) => Some(number.to_string()),
            (Converter::Float, ScalarValue::Integer(number)) => Some(number.to_string()),
            (Converter::Float, ScalarValue::Text(text)) => {
                text.trim().parse::<f64>().ok().map(|n| n.to_string())
            }
            _ => None,
        }
    }
}

impl fmt::Display for Converter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Converter::Text => "text",
            Converter::Integer => "integer",
            Converter::Boolean => "boolean",
            Converter::Float => "float",
            Converter::Enumeration => "enumeration",
        };
        f.write_str(name)
    }
}

/// Declared type of an attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    #[serde(rename = "type")]
    pub declared_type: String,
    #[serde(default)]
    pub list: bool,
}

/// Attribute definitions of a configuration type
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeInfo {
    pub name: String,
    /// Present for value types, absent for object types
    pub converter: Option<Converter>,
    pub attributes: IndexMap<String, AttributeInfo>,
}

impl TypeInfo {
    /// Type information of the primitive value types every registry knows
    pub fn builtin(type_name: &str) -> Option<TypeInfo> {
        let converter = match type_name {
            "String" | "string" => Converter::Text,
            "int" | "long" | "short" | "byte" | "Integer" | "Long" | "Short" => {
                Converter::Integer
            }
            "boolean" | "Boolean" => Converter::Boolean,
            "float" | "double" | "Float" | "Double" => Converter::Float,
            _ => return None,
        };
        Some(TypeInfo {
            name: type_name.to_string(),
            converter: Some(converter),
            attributes: IndexMap::new(),
        })
    }
}

/// Source of type metadata
pub trait TypeRegistry {
    fn type_info(&self, type_name: &str) -> Result<Arc<TypeInfo>, ExportError>;
}

// =============================================================================
// CONFIGURATION OBJECTS
// =============================================================================

/// A live configuration object
///
/// `attributes` is a plain map read; `lookup_children` is a containment
/// query that may legitimately return nothing.
pub trait ConfigObject: Sized {
    fn type_name(&self) -> &str;

    fn attributes(&self) -> Result<AttributeMap<Self>, ExportError>;

    fn lookup_children(&self, type_name: &str) -> Result<Vec<Self>, ExportError>;

    /// Stable identifier used to detect reference cycles, `None` for objects
    /// that cannot refer back to their ancestors
    fn identity(&self) -> Option<&str> {
        None
    }
}

// =============================================================================
// DEPLOYMENT TASKS
// =============================================================================

/// A deployment task record exactly as the administrative system reports it
///
/// `task_data[0]` is a template row without export value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawTask {
    pub name: String,
    pub column_names: Vec<String>,
    pub mutable_columns: Vec<bool>,
    pub required_columns: Vec<bool>,
    #[serde(default)]
    pub task_data: Vec<Vec<Option<String>>>,
}

pub trait TaskSource {
    fn application_tasks(&self, app_name: &str) -> Result<Vec<RawTask>, ExportError>;
}

// =============================================================================
// DEPLOYMENT METADATA
// =============================================================================

/// A module of a deployed application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleDeployment {
    #[serde(rename = "type")]
    pub module_type: String,
    pub uri: String,
    #[serde(default)]
    pub classloader_mode: String,
}

impl ModuleDeployment {
    pub const WEB_MODULE_TYPE: &'static str = "WebModuleDeployment";

    pub fn is_web_module(&self) -> bool {
        self.module_type == Self::WEB_MODULE_TYPE
    }
}

/// Deployment settings every application has
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeploymentInfo {
    pub starting_weight: i64,
    pub class_loading_mode: String,
    pub modules: Vec<ModuleDeployment>,
}

/// Metadata blocks that only some environments can provide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionalBlock {
    ScaModuleProperties,
    ScaImportWsBindings,
    ApplicationPolicySetAttachments,
    ClientPolicySetAttachments,
    ProviderPolicySharingInfo,
}

impl OptionalBlock {
    /// Blocks in the order they are added to the manifest extras
    pub const ALL: [OptionalBlock; 5] = [
        OptionalBlock::ScaModuleProperties,
        OptionalBlock::ScaImportWsBindings,
        OptionalBlock::ApplicationPolicySetAttachments,
        OptionalBlock::ClientPolicySetAttachments,
        OptionalBlock::ProviderPolicySharingInfo,
    ];

    /// Extras key of the block
    pub fn key(&self) -> &'static str {
        match self {
            OptionalBlock::ScaModuleProperties => "scaModuleProperties",
            OptionalBlock::ScaImportWsBindings => "scaImportWSBindings",
            OptionalBlock::ApplicationPolicySetAttachments => "applicationWSPolicySetAttachments",
            OptionalBlock::ClientPolicySetAttachments => "clientWSPolicySetAttachments",
            OptionalBlock::ProviderPolicySharingInfo => "providerPolicySharingInfo",
        }
    }
}

/// Non-task deployment metadata of an application
pub trait DeploymentMetadata {
    /// Mandatory settings; a failure here aborts the export
    fn deployment(&self, app_name: &str) -> Result<DeploymentInfo, ExportError>;

    /// Rows of an optional block, already shaped for the manifest
    fn optional_block(&self, _app_name: &str, _block: OptionalBlock) -> Result<Vec<Row>, ProviderError> {
        Err(ProviderError::Unsupported)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_converters() {
        assert_eq!(
            Converter::Integer.convert(&ScalarValue::Integer(42)),
            Some("42".to_string())
        );
        assert_eq!(
            Converter::Integer.convert(&ScalarValue::Text(" 7 ".to_string())),
            Some("7".to_string())
        );
        assert_eq!(Converter::Integer.convert(&ScalarValue::Boolean(true)), None);
        assert_eq!(
            Converter::Boolean.convert(&ScalarValue::Text("TRUE".to_string())),
            Some("true".to_string())
        );
        assert_eq!(
            Converter::Float.convert(&ScalarValue::Integer(3)),
            Some("3".to_string())
        );
        assert_eq!(
            Converter::Text.convert(&ScalarValue::Boolean(false)),
            Some("false".to_string())
        );
        assert_eq!(
            Converter::Enumeration.convert(&ScalarValue::Text("PARENT_LAST".to_string())),
            Some("PARENT_LAST".to_string())
        );
    }

    #[test]
    fn test_builtin_types() {
        assert!(TypeInfo::builtin("String").is_some_and(|t| t.converter == Some(Converter::Text)));
        assert!(TypeInfo::builtin("long").is_some_and(|t| t.converter == Some(Converter::Integer)));
        assert!(TypeInfo::builtin("DataSource").is_none());
    }

    #[test]
    fn test_optional_block_keys_unique() {
        let mut keys: Vec<&str> = OptionalBlock::ALL.iter().map(OptionalBlock::key).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), OptionalBlock::ALL.len());
    }
}
