//! Configuration tree exporter
//!
//! Walks a live configuration object and its declared children, projecting
//! each object through the export schema:
//! - keys are converted to strings, keys without a converter are left out
//! - attributes with a converter become strings (`;`-joined for lists)
//! - attributes without a converter are exported recursively
//! - children are looked up per declared type and exported recursively
//!
//! Object lists only keep elements whose type is in the schema, while a single
//! nested object is always exported, as a stub when its type is unknown.
//! An object that is reached again below itself is a source error.

use crate::admin::{AttributeInfo, AttributeValue, ConfigObject, Converter, TypeInfo, TypeRegistry};
use crate::errors::ExportError;
use crate::schema::{ExportSchema, ExportSchemaEntry};
use cellport_manifest::{AttributeNodeValue, ManifestObjectNode};
use std::sync::Arc;
use tracing::debug;

/// Exports configuration objects with one schema and type registry
pub struct ConfigExporter<'a, R: TypeRegistry + ?Sized> {
    registry: &'a R,
    schema: &'a ExportSchema,
}

impl<'a, R: TypeRegistry + ?Sized> ConfigExporter<'a, R> {
    pub fn new(registry: &'a R, schema: &'a ExportSchema) -> Self {
        ConfigExporter { registry, schema }
    }

    /// Export several root objects, in input order
    pub fn export_all<O: ConfigObject>(&self, objects: &[O]) -> Result<Vec<ManifestObjectNode>, ExportError> {
        objects.iter().map(|object| self.export(object)).collect()
    }

    /// Export one object and everything below it
    pub fn export<O: ConfigObject>(&self, object: &O) -> Result<ManifestObjectNode, ExportError> {
        self.export_object(object, &mut Vec::new())
    }

    /// `path` holds the identities of the objects currently being exported
    fn export_object<O: ConfigObject>(
        &self,
        object: &O,
        path: &mut Vec<String>,
    ) -> Result<ManifestObjectNode, ExportError> {
        let type_name = object.type_name();
        debug!("exporting {}", type_name);

        let Some(entry) = self.schema.get(type_name) else {
            return Ok(ManifestObjectNode::new(type_name));
        };

        let Some(id) = object.identity() else {
            return self.project(object, entry, path);
        };
        if path.iter().any(|visited| visited.as_str() == id) {
            return Err(ExportError::query_failed(
                format!("object {}", id),
                format!("reference cycle through {}", path.join(" -> ")),
            ));
        }
        path.push(id.to_string());
        let node = self.project(object, entry, path);
        path.pop();
        node
    }

    fn project<O: ConfigObject>(
        &self,
        object: &O,
        entry: &ExportSchemaEntry,
        path: &mut Vec<String>,
    ) -> Result<ManifestObjectNode, ExportError> {
        let type_name = object.type_name();
        let mut node = ManifestObjectNode::new(type_name);
        let type_info = self.registry.type_info(type_name)?;
        let attributes = object.attributes()?;

        for name in &entry.keys {
            let Some(value) = attributes.get(name) else {
                continue;
            };
            let (info, converter) = self.resolve(&type_info, name)?;
            if let Some(converter) = converter {
                let key = convert_value(converter, info, value, &context(type_name, name))?;
                node.keys.insert(name.clone(), key);
            }
        }

        for name in &entry.attributes {
            let Some(value) = attributes.get(name) else {
                continue;
            };
            let (info, converter) = self.resolve(&type_info, name)?;
            let projected = match converter {
                Some(converter) => AttributeNodeValue::Text(convert_value(
                    converter,
                    info,
                    value,
                    &context(type_name, name),
                )?),
                None if info.list => {
                    AttributeNodeValue::List(self.export_list(value, &context(type_name, name), path)?)
                }
                None => match value {
                    AttributeValue::Object(nested) => {
                        AttributeNodeValue::Object(Box::new(self.export_object(nested, path)?))
                    }
                    _ => {
                        return Err(ExportError::schema_mismatch(
                            context(type_name, name),
                            format!("type {} has no converter for a scalar value", info.declared_type),
                        ))
                    }
                },
            };
            node.attributes.insert(name.clone(), projected);
            node.ordered_attribute_names.push(name.clone());
        }

        for child_type in &entry.children {
            for child in object.lookup_children(child_type)? {
                node.children.push(self.export_object(&child, path)?);
            }
        }

        Ok(node)
    }

    fn export_list<O: ConfigObject>(
        &self,
        value: &AttributeValue<O>,
        context: &str,
        path: &mut Vec<String>,
    ) -> Result<Vec<ManifestObjectNode>, ExportError> {
        let mut nodes = Vec::new();
        for element in list_elements(value, context)? {
            match element {
                AttributeValue::Object(nested) if self.schema.contains(nested.type_name()) => {
                    nodes.push(self.export_object(nested, path)?);
                }
                AttributeValue::Object(nested) => {
                    debug!("dropping {} element of unexported type {}", context, nested.type_name());
                }
                _ => {
                    return Err(ExportError::schema_mismatch(
                        context,
                        "object list contains a scalar value",
                    ))
                }
            }
        }
        Ok(nodes)
    }

    /// Attribute definition and converter of an attribute's value type
    fn resolve<'t>(
        &self,
        type_info: &'t TypeInfo,
        name: &str,
    ) -> Result<(&'t AttributeInfo, Option<Converter>), ExportError> {
        let info = type_info.attributes.get(name).ok_or_else(|| {
            ExportError::schema_mismatch(
                context(&type_info.name, name),
                "attribute is not defined by the type",
            )
        })?;
        let value_type: Arc<TypeInfo> = self.registry.type_info(&info.declared_type)?;
        Ok((info, value_type.converter))
    }
}

fn context(type_name: &str, attribute: &str) -> String {
    format!("{}.{}", type_name, attribute)
}

fn list_elements<'v, O>(value: &'v AttributeValue<O>, context: &str) -> Result<&'v [AttributeValue<O>], ExportError> {
    match value {
        AttributeValue::List(elements) => Ok(elements),
        _ => Err(ExportError::schema_mismatch(
            context,
            "list attribute has a single value",
        )),
    }
}

fn convert_value<O>(
    converter: Converter,
    info: &AttributeInfo,
    value: &AttributeValue<O>,
    context: &str,
) -> Result<String, ExportError> {
    if info.list {
        let converted = list_elements(value, context)?
            .iter()
            .map(|element| convert_scalar(converter, element, context))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(converted.join(";"))
    } else {
        convert_scalar(converter, value, context)
    }
}

fn convert_scalar<O>(converter: Converter, value: &AttributeValue<O>, context: &str) -> Result<String, ExportError> {
    let AttributeValue::Scalar(scalar) = value else {
        return Err(ExportError::schema_mismatch(
            context,
            format!("{} converter cannot render an object value", converter),
        ));
    };
    converter
        .convert(scalar)
        .ok_or_else(|| ExportError::Conversion {
            context: context.to_string(),
            converter,
            value: scalar.to_string(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{AttributeMap, ScalarValue};
    use indexmap::IndexMap;

    // In-memory object graph for exercising the walker
    #[derive(Debug, Clone)]
    struct Obj {
        type_name: String,
        attributes: Vec<(String, AttributeValue<Obj>)>,
        children: Vec<Obj>,
    }

    impl Obj {
        fn new(type_name: &str) -> Self {
            Obj {
                type_name: type_name.to_string(),
                attributes: Vec::new(),
                children: Vec::new(),
            }
        }

        fn attr(mut self, name: &str, value: AttributeValue<Obj>) -> Self {
            self.attributes.push((name.to_string(), value));
            self
        }

        fn text(self, name: &str, value: &str) -> Self {
            self.attr(name, AttributeValue::Scalar(ScalarValue::Text(value.to_string())))
        }

        fn child(mut self, child: Obj) -> Self {
            self.children.push(child);
            self
        }
    }

    impl ConfigObject for Obj {
        fn type_name(&self) -> &str {
            &self.type_name
        }

        fn attributes(&self) -> Result<AttributeMap<Self>, ExportError> {
            Ok(self.attributes.iter().cloned().collect())
        }

        fn lookup_children(&self, type_name: &str) -> Result<Vec<Self>, ExportError> {
            Ok(self
                .children
                .iter()
                .filter(|c| c.type_name == type_name)
                .cloned()
                .collect())
        }
    }

    struct Registry {
        types: IndexMap<String, Arc<TypeInfo>>,
    }

    impl Registry {
        fn new() -> Self {
            let mut types = IndexMap::new();
            let mut add = |name: &str, attributes: &[(&str, &str, bool)]| {
                let info = TypeInfo {
                    name: name.to_string(),
                    converter: None,
                    attributes: attributes
                        .iter()
                        .map(|(attr, ty, list)| {
                            (
                                (*attr).to_string(),
                                AttributeInfo {
                                    declared_type: (*ty).to_string(),
                                    list: *list,
                                },
                            )
                        })
                        .collect(),
                };
                types.insert(name.to_string(), Arc::new(info));
            };
            add(
                "ServerCluster",
                &[
                    ("name", "String", false),
                    ("description", "String", false),
                    ("members", "ClusterMember", true),
                    ("nodeGroupName", "String", false),
                    ("enableHA", "boolean", false),
                ],
            );
            add(
                "ClusterMember",
                &[
                    ("nodeName", "String", false),
                    ("memberName", "String", false),
                    ("weight", "int", false),
                    ("uniqueId", "String", false),
                ],
            );
            add(
                "JDBCProvider",
                &[
                    ("name", "String", false),
                    ("classpath", "String", true),
                    ("propertySet", "J2EEResourcePropertySet", false),
                ],
            );
            add("J2EEResourcePropertySet", &[("resourceProperties", "J2EEResourceProperty", true)]);
            add("DataSource", &[("name", "String", false), ("jndiName", "String", false)]);
            add("MemberWeights", &[]);
            Registry { types }
        }
    }

    impl TypeRegistry for Registry {
        fn type_info(&self, type_name: &str) -> Result<Arc<TypeInfo>, ExportError> {
            if let Some(info) = self.types.get(type_name) {
                return Ok(Arc::clone(info));
            }
            TypeInfo::builtin(type_name)
                .map(Arc::new)
                .ok_or_else(|| ExportError::query_failed(type_name, "unknown type"))
        }
    }

    fn member(node: &str, name: &str, weight: i64) -> Obj {
        Obj::new("ClusterMember")
            .text("nodeName", node)
            .text("memberName", name)
            .attr("weight", AttributeValue::Scalar(ScalarValue::Integer(weight)))
    }

    fn cluster() -> Obj {
        Obj::new("ServerCluster")
            .text("name", "shopCluster")
            .text("description", "storefront")
            .attr(
                "members",
                AttributeValue::List(vec![
                    AttributeValue::Object(member("node01", "shop01", 2)),
                    AttributeValue::Object(Obj::new("MemberWeights")),
                    AttributeValue::Object(member("node02", "shop02", 3)),
                ]),
            )
    }

    fn export(object: &Obj, schema: &ExportSchema) -> Result<ManifestObjectNode, ExportError> {
        let registry = Registry::new();
        ConfigExporter::new(&registry, schema).export(object)
    }

    #[test]
    fn test_unknown_root_type_is_stub() {
        let schema = ExportSchema::builtin();
        let object = Obj::new("VirtualHost").text("name", "default_host");
        let result = export(&object, &schema);
        assert!(result.is_ok_and(|node| node.type_name == "VirtualHost" && node.is_stub()));
    }

    #[test]
    fn test_keys_attributes_and_order() {
        let schema = ExportSchema::builtin();
        let Ok(node) = export(&cluster(), &schema) else {
            assert!(false, "export failed");
            return;
        };
        assert_eq!(node.type_name, "ServerCluster");
        assert_eq!(node.key("name"), Some("shopCluster"));
        assert_eq!(node.ordered_attribute_names, vec!["description", "members"]);
        assert_eq!(
            node.attribute("description"),
            Some(&AttributeNodeValue::Text("storefront".to_string()))
        );

        let declared = schema.get("ServerCluster").map(|e| e.attributes.clone()).unwrap_or_default();
        assert!(node.attributes.keys().all(|k| declared.contains(k)));
    }

    #[test]
    fn test_object_list_drops_unknown_types() {
        let schema = ExportSchema::builtin();
        let Ok(node) = export(&cluster(), &schema) else {
            return;
        };
        let Some(AttributeNodeValue::List(members)) = node.attribute("members") else {
            assert!(false, "members should be a list");
            return;
        };
        assert_eq!(members.len(), 2);
        assert_eq!(members[0].key("nodeName"), Some("node01"));
        assert_eq!(members[0].key("memberName"), Some("shop01"));
        assert_eq!(
            members[1].attribute("weight"),
            Some(&AttributeNodeValue::Text("3".to_string()))
        );
    }

    #[test]
    fn test_scalar_object_of_unknown_type_is_stubbed() {
        let schema = ExportSchema::builtin();
        let provider = Obj::new("JDBCProvider")
            .text("name", "Derby")
            .attr(
                "propertySet",
                AttributeValue::Object(Obj::new("MemberWeights")),
            );
        let Ok(node) = export(&provider, &schema) else {
            return;
        };
        let Some(AttributeNodeValue::Object(nested)) = node.attribute("propertySet") else {
            assert!(false, "propertySet should be an object");
            return;
        };
        assert_eq!(nested.type_name, "MemberWeights");
        assert!(nested.is_stub());
    }

    #[test]
    fn test_list_with_converter_is_joined() {
        let schema = ExportSchema::builtin();
        let paths = ["/opt/derby/lib/derby.jar", "/opt/derby/lib/derbyclient.jar", "/opt/ext.jar"];
        let provider = Obj::new("JDBCProvider").text("name", "Derby").attr(
            "classpath",
            AttributeValue::List(
                paths
                    .iter()
                    .map(|p| AttributeValue::Scalar(ScalarValue::Text((*p).to_string())))
                    .collect(),
            ),
        );
        let Ok(node) = export(&provider, &schema) else {
            return;
        };
        let Some(AttributeNodeValue::Text(joined)) = node.attribute("classpath") else {
            assert!(false, "classpath should be text");
            return;
        };
        assert_eq!(joined, &paths.join(";"));
        assert_eq!(joined.split(';').count(), paths.len());
    }

    #[test]
    fn test_children_follow_schema_order() {
        let schema = ExportSchema::new()
            .with_entry("JDBCProvider", ExportSchemaEntry::new(&["name"], &[], &["DataSource"]))
            .with_entry("DataSource", ExportSchemaEntry::new(&["name"], &["jndiName"], &[]))
            .with_entry(
                "ServerCluster",
                ExportSchemaEntry::new(&["name"], &[], &["DataSource", "JDBCProvider"]),
            );
        let object = Obj::new("ServerCluster")
            .text("name", "c1")
            .child(Obj::new("JDBCProvider").text("name", "p1"))
            .child(Obj::new("DataSource").text("name", "ds1").text("jndiName", "jdbc/one"))
            .child(Obj::new("DataSource").text("name", "ds2"));
        let Ok(node) = export(&object, &schema) else {
            return;
        };
        let order: Vec<(&str, Option<&str>)> = node
            .children
            .iter()
            .map(|c| (c.type_name.as_str(), c.key("name")))
            .collect();
        assert_eq!(
            order,
            vec![
                ("DataSource", Some("ds1")),
                ("DataSource", Some("ds2")),
                ("JDBCProvider", Some("p1"))
            ]
        );
        assert!(node.children[1].ordered_attribute_names.is_empty());
    }

    #[test]
    fn test_key_without_converter_is_left_out() {
        let schema = ExportSchema::new().with_entry(
            "JDBCProvider",
            ExportSchemaEntry::new(&["name", "propertySet"], &[], &[]),
        );
        let provider = Obj::new("JDBCProvider").text("name", "Derby").attr(
            "propertySet",
            AttributeValue::Object(Obj::new("J2EEResourcePropertySet")),
        );
        let Ok(node) = export(&provider, &schema) else {
            assert!(false, "export failed");
            return;
        };
        assert_eq!(node.key("name"), Some("Derby"));
        assert!(!node.keys.contains_key("propertySet"));
        assert!(node.attributes.is_empty());
    }

    #[test]
    fn test_undeclared_attribute_is_mismatch() {
        let schema = ExportSchema::new().with_entry(
            "DataSource",
            ExportSchemaEntry::new(&["name"], &["statementCacheSize"], &[]),
        );
        let object = Obj::new("DataSource").text("name", "ds").text("statementCacheSize", "10");
        assert!(matches!(
            export(&object, &schema),
            Err(ExportError::SchemaMismatch { ref context, .. }) if context == "DataSource.statementCacheSize"
        ));
    }

    #[test]
    fn test_failed_conversion_is_error() {
        let schema = ExportSchema::builtin();
        let object = Obj::new("ClusterMember")
            .text("nodeName", "node01")
            .text("weight", "heavy");
        assert!(matches!(
            export(&object, &schema),
            Err(ExportError::Conversion { converter: Converter::Integer, .. })
        ));
    }

    #[test]
    fn test_export_all_keeps_input_order() {
        let schema = ExportSchema::builtin();
        let registry = Registry::new();
        let exporter = ConfigExporter::new(&registry, &schema);
        let objects = vec![member("n2", "b", 1), member("n1", "a", 1)];
        let result = exporter.export_all(&objects);
        assert!(result.is_ok_and(|nodes| {
            nodes.iter().map(|n| n.key("nodeName")).collect::<Vec<_>>() == vec![Some("n2"), Some("n1")]
        }));
    }
}
