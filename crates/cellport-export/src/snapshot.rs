//! JSON snapshot of an administrative system
//!
//! A snapshot captures type metadata, configuration objects and deployed
//! applications in one document so the export engine can run without a live
//! system:
//!
//! ```json
//! {
//!   "types": {
//!     "DataSource": { "attributes": { "name": { "type": "String" } } }
//!   },
//!   "objects": {
//!     "ds1": { "type": "DataSource", "attributes": { "name": "ShopDS" }, "children": [] }
//!   },
//!   "applications": {
//!     "shop": { "startingWeight": 1, "classLoadingMode": "PARENT_FIRST", "modules": [], "tasks": [] }
//!   }
//! }
//! ```
//!
//! Attribute values are JSON scalars, `{"$ref": "<object id>"}` references or
//! arrays of either. `null` values are treated as absent.

use crate::admin::{
    AttributeInfo, AttributeMap, AttributeValue, ConfigObject, Converter, DeploymentInfo,
    DeploymentMetadata, ModuleDeployment, OptionalBlock, RawTask, ScalarValue, TaskSource,
    TypeInfo, TypeRegistry,
};
use crate::errors::{ExportError, ProviderError};
use ahash::AHashMap;
use cellport_manifest::Row;
use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

const REFERENCE_KEY: &str = "$ref";

#[derive(Debug, Deserialize)]
struct SnapshotDocument {
    #[serde(default)]
    types: IndexMap<String, TypeDocument>,
    #[serde(default)]
    objects: IndexMap<String, ObjectDocument>,
    #[serde(default)]
    applications: IndexMap<String, ApplicationDocument>,
}

#[derive(Debug, Deserialize)]
struct TypeDocument {
    #[serde(default)]
    converter: Option<Converter>,
    #[serde(default)]
    attributes: IndexMap<String, AttributeInfo>,
}

#[derive(Debug, Deserialize)]
struct ObjectDocument {
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    attributes: IndexMap<String, Value>,
    #[serde(default)]
    children: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ApplicationDocument {
    #[serde(default)]
    starting_weight: i64,
    #[serde(default)]
    class_loading_mode: String,
    #[serde(default)]
    modules: Vec<ModuleDeployment>,
    #[serde(default)]
    tasks: Vec<RawTask>,
    sca_module_properties: Option<Vec<Row>>,
    #[serde(rename = "scaImportWSBindings")]
    sca_import_ws_bindings: Option<Vec<Row>>,
    #[serde(rename = "applicationWSPolicySetAttachments")]
    application_policy_set_attachments: Option<Vec<Row>>,
    #[serde(rename = "clientWSPolicySetAttachments")]
    client_policy_set_attachments: Option<Vec<Row>>,
    provider_policy_sharing_info: Option<Vec<Row>>,
}

impl ApplicationDocument {
    fn block(&self, block: OptionalBlock) -> Option<&Vec<Row>> {
        match block {
            OptionalBlock::ScaModuleProperties => self.sca_module_properties.as_ref(),
            OptionalBlock::ScaImportWsBindings => self.sca_import_ws_bindings.as_ref(),
            OptionalBlock::ApplicationPolicySetAttachments => {
                self.application_policy_set_attachments.as_ref()
            }
            OptionalBlock::ClientPolicySetAttachments => self.client_policy_set_attachments.as_ref(),
            OptionalBlock::ProviderPolicySharingInfo => self.provider_policy_sharing_info.as_ref(),
        }
    }
}

/// An administrative system captured as a JSON document
#[derive(Debug)]
pub struct Snapshot {
    types: AHashMap<String, Arc<TypeInfo>>,
    objects: IndexMap<String, ObjectDocument>,
    applications: IndexMap<String, ApplicationDocument>,
}

impl Snapshot {
    pub fn from_json_str(content: &str) -> Result<Self, ExportError> {
        let document: SnapshotDocument = serde_json::from_str(content)?;
        let types = document
            .types
            .into_iter()
            .map(|(name, doc)| {
                let info = TypeInfo {
                    name: name.clone(),
                    converter: doc.converter,
                    attributes: doc.attributes,
                };
                (name, Arc::new(info))
            })
            .collect();
        Ok(Snapshot {
            types,
            objects: document.objects,
            applications: document.applications,
        })
    }

    /// Configuration object by id
    pub fn object(&self, id: &str) -> Result<SnapshotObject<'_>, ExportError> {
        let (id, document) = self
            .objects
            .get_key_value(id)
            .ok_or_else(|| ExportError::query_failed(format!("object {}", id), "not found in snapshot"))?;
        Ok(SnapshotObject {
            snapshot: self,
            id,
            document,
        })
    }

    /// Several configuration objects, in the order requested
    pub fn objects<S: AsRef<str>>(&self, ids: &[S]) -> Result<Vec<SnapshotObject<'_>>, ExportError> {
        ids.iter().map(|id| self.object(id.as_ref())).collect()
    }

    pub fn application_names(&self) -> impl Iterator<Item = &str> {
        self.applications.keys().map(String::as_str)
    }

    fn application(&self, app_name: &str) -> Result<&ApplicationDocument, ExportError> {
        self.applications.get(app_name).ok_or_else(|| {
            ExportError::query_failed(format!("application {}", app_name), "not found in snapshot")
        })
    }
}

impl TypeRegistry for Snapshot {
    fn type_info(&self, type_name: &str) -> Result<Arc<TypeInfo>, ExportError> {
        if let Some(info) = self.types.get(type_name) {
            return Ok(Arc::clone(info));
        }
        TypeInfo::builtin(type_name)
            .map(Arc::new)
            .ok_or_else(|| ExportError::query_failed(format!("type {}", type_name), "no type information"))
    }
}

impl TaskSource for Snapshot {
    fn application_tasks(&self, app_name: &str) -> Result<Vec<RawTask>, ExportError> {
        Ok(self.application(app_name)?.tasks.clone())
    }
}

impl DeploymentMetadata for Snapshot {
    fn deployment(&self, app_name: &str) -> Result<DeploymentInfo, ExportError> {
        let application = self.application(app_name)?;
        Ok(DeploymentInfo {
            starting_weight: application.starting_weight,
            class_loading_mode: application.class_loading_mode.clone(),
            modules: application.modules.clone(),
        })
    }

    fn optional_block(&self, app_name: &str, block: OptionalBlock) -> Result<Vec<Row>, ProviderError> {
        let application = self
            .application(app_name)
            .map_err(|err| ProviderError::Failed(err.to_string()))?;
        application
            .block(block)
            .cloned()
            .ok_or(ProviderError::Unsupported)
    }
}

/// A configuration object borrowed from a [`Snapshot`]
#[derive(Debug, Clone, Copy)]
pub struct SnapshotObject<'a> {
    snapshot: &'a Snapshot,
    id: &'a str,
    document: &'a ObjectDocument,
}

impl<'a> SnapshotObject<'a> {
    pub fn id(&self) -> &'a str {
        self.id
    }

    fn convert(&self, attribute: &str, value: &Value) -> Result<Option<AttributeValue<Self>>, ExportError> {
        let converted = match value {
            Value::Null => return Ok(None),
            Value::Bool(flag) => AttributeValue::Scalar(ScalarValue::Boolean(*flag)),
            Value::Number(number) => match (number.as_i64(), number.as_f64()) {
                (Some(integer), _) => AttributeValue::Scalar(ScalarValue::Integer(integer)),
                (None, Some(float)) => AttributeValue::Scalar(ScalarValue::Float(float)),
                (None, None) => AttributeValue::Scalar(ScalarValue::Text(number.to_string())),
            },
            Value::String(text) => AttributeValue::Scalar(ScalarValue::Text(text.clone())),
            Value::Array(values) => {
                let mut elements = Vec::with_capacity(values.len());
                for element in values {
                    if let Some(element) = self.convert(attribute, element)? {
                        elements.push(element);
                    }
                }
                AttributeValue::List(elements)
            }
            Value::Object(fields) => {
                let Some(Value::String(target)) = fields.get(REFERENCE_KEY) else {
                    return Err(ExportError::query_failed(
                        format!("object {} attribute {}", self.id, attribute),
                        "nested objects must be written as {\"$ref\": \"<id>\"}",
                    ));
                };
                AttributeValue::Object(self.snapshot.object(target)?)
            }
        };
        Ok(Some(converted))
    }
}

impl ConfigObject for SnapshotObject<'_> {
    fn type_name(&self) -> &str {
        &self.document.type_name
    }

    fn attributes(&self) -> Result<AttributeMap<Self>, ExportError> {
        let mut attributes = AttributeMap::new();
        for (name, value) in &self.document.attributes {
            if let Some(value) = self.convert(name, value)? {
                attributes.insert(name.clone(), value);
            }
        }
        Ok(attributes)
    }

    fn lookup_children(&self, type_name: &str) -> Result<Vec<Self>, ExportError> {
        let mut children = Vec::new();
        for id in &self.document.children {
            let child = self.snapshot.object(id)?;
            if child.type_name() == type_name {
                children.push(child);
            }
        }
        Ok(children)
    }

    fn identity(&self) -> Option<&str> {
        Some(self.id)
    }
}
