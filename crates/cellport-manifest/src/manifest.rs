//! Manifest operations - construction, lookup and ordering
//!
//! The exporter fills manifests in whatever order the administrative system
//! reports data; the helpers here make the final value deterministic.

use crate::types::{ApplicationManifest, AttributeNodeValue, ManifestObjectNode, OptionValue};
use indexmap::IndexMap;

impl ApplicationManifest {
    /// Create an empty manifest for an application
    pub fn new(app_name: &str) -> Self {
        ApplicationManifest {
            app_name: app_name.to_string(),
            artifact_path: Self::artifact_path_for(app_name),
            options: IndexMap::new(),
            extras: IndexMap::new(),
        }
    }

    /// Relative path of the deployable artifact for an application
    pub fn artifact_path_for(app_name: &str) -> String {
        format!("../applications/{}.ear", app_name)
    }

    pub fn option(&self, name: &str) -> Option<&OptionValue> {
        self.options.get(name)
    }

    pub fn extra(&self, name: &str) -> Option<&OptionValue> {
        self.extras.get(name)
    }

    /// Sort the rows of every table-valued option and extra
    ///
    /// Scalar entries and the insertion order of keys are left untouched.
    pub fn sort_tables(&mut self) {
        for value in self.options.values_mut().chain(self.extras.values_mut()) {
            if let OptionValue::Table(rows) = value {
                rows.sort();
            }
        }
    }

    /// Check that every table in the manifest is sorted row-wise
    pub fn tables_sorted(&self) -> bool {
        self.options
            .values()
            .chain(self.extras.values())
            .filter_map(OptionValue::as_table)
            .all(|rows| rows.windows(2).all(|pair| pair[0] <= pair[1]))
    }

    /// Check if the manifest carries neither options nor extras
    pub fn is_empty(&self) -> bool {
        self.options.is_empty() && self.extras.is_empty()
    }
}

impl ManifestObjectNode {
    /// Create an empty node; this is also the stub exported for unknown types
    pub fn new(type_name: &str) -> Self {
        ManifestObjectNode {
            type_name: type_name.to_string(),
            ..Default::default()
        }
    }

    /// A stub has no keys, attributes or children
    pub fn is_stub(&self) -> bool {
        self.keys.is_empty() && self.attributes.is_empty() && self.children.is_empty()
    }

    pub fn key(&self, name: &str) -> Option<&str> {
        self.keys.get(name).map(String::as_str)
    }

    pub fn attribute(&self, name: &str) -> Option<&AttributeNodeValue> {
        self.attributes.get(name)
    }

    /// Attributes in emission order
    pub fn ordered_attributes(&self) -> impl Iterator<Item = (&str, &AttributeNodeValue)> {
        self.ordered_attribute_names
            .iter()
            .filter_map(|name| self.attributes.get(name).map(|value| (name.as_str(), value)))
    }

    /// Count this node and every node below it (attributes and children)
    pub fn node_count(&self) -> usize {
        let nested: usize = self
            .attributes
            .values()
            .map(|value| match value {
                AttributeNodeValue::Text(_) => 0,
                AttributeNodeValue::Object(node) => node.node_count(),
                AttributeNodeValue::List(nodes) => nodes.iter().map(Self::node_count).sum(),
            })
            .sum();
        let children: usize = self.children.iter().map(Self::node_count).sum();
        1 + nested + children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifact_path() {
        let manifest = ApplicationManifest::new("shop");
        assert_eq!(manifest.artifact_path, "../applications/shop.ear");
        assert!(manifest.is_empty());
    }

    #[test]
    fn test_sort_tables_leaves_scalars_and_key_order() {
        let mut manifest = ApplicationManifest::new("shop");
        manifest.options.insert(
            "MapWebModToVH".to_string(),
            OptionValue::Table(vec![
                vec!["web2".to_string(), "b".to_string()],
                vec!["web1".to_string(), "z".to_string()],
                vec!["web1".to_string(), "a".to_string()],
            ]),
        );
        manifest
            .options
            .insert("reloadInterval".to_string(), OptionValue::from("3"));
        manifest.extras.insert(
            "webModuleClassLoadingMode".to_string(),
            OptionValue::Table(vec![
                vec!["b.war".to_string(), "PARENT_LAST".to_string()],
                vec!["a.war".to_string(), "PARENT_FIRST".to_string()],
            ]),
        );
        assert!(!manifest.tables_sorted());

        manifest.sort_tables();

        assert!(manifest.tables_sorted());
        let keys: Vec<&str> = manifest.options.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["MapWebModToVH", "reloadInterval"]);
        assert_eq!(
            manifest
                .option("MapWebModToVH")
                .and_then(OptionValue::as_table)
                .map(|rows| rows[0].clone()),
            Some(vec!["web1".to_string(), "a".to_string()])
        );
        assert_eq!(
            manifest.option("reloadInterval").and_then(OptionValue::as_scalar),
            Some("3")
        );
    }

    #[test]
    fn test_stub_and_node_count() {
        let mut node = ManifestObjectNode::new("Server");
        assert!(node.is_stub());

        node.keys.insert("name".to_string(), "server1".to_string());
        node.attributes.insert(
            "processDefinitions".to_string(),
            AttributeNodeValue::List(vec![ManifestObjectNode::new("JavaProcessDef")]),
        );
        node.ordered_attribute_names
            .push("processDefinitions".to_string());
        node.children.push(ManifestObjectNode::new("JDBCProvider"));

        assert!(!node.is_stub());
        assert_eq!(node.key("name"), Some("server1"));
        assert_eq!(node.node_count(), 3);
        assert_eq!(node.ordered_attributes().count(), 1);
    }
}
