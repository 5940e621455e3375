//! Export schema
//!
//! Declares, per configuration type, which attributes become identity keys,
//! which are projected as attributes and which child types are exported
//! recursively. Types that are not declared are exported as stubs or dropped.
//!
//! Schemas are plain data. They can be loaded from TOML:
//!
//! ```toml
//! [DataSource]
//! keys = ["name"]
//! attributes = ["jndiName", "connectionPool"]
//! children = []
//! ```

use crate::errors::ExportError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Projection rules for one configuration type
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportSchemaEntry {
    #[serde(default)]
    pub keys: SmallVec<[String; 2]>,
    #[serde(default)]
    pub attributes: Vec<String>,
    #[serde(default)]
    pub children: SmallVec<[String; 4]>,
}

impl ExportSchemaEntry {
    pub fn new(keys: &[&str], attributes: &[&str], children: &[&str]) -> Self {
        ExportSchemaEntry {
            keys: keys.iter().map(|s| (*s).to_string()).collect(),
            attributes: attributes.iter().map(|s| (*s).to_string()).collect(),
            children: children.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

/// Mapping from type name to its projection rules
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExportSchema {
    entries: IndexMap<String, ExportSchemaEntry>,
}

impl ExportSchema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace the entry of a type
    pub fn with_entry(mut self, type_name: &str, entry: ExportSchemaEntry) -> Self {
        self.entries.insert(type_name.to_string(), entry);
        self
    }

    pub fn get(&self, type_name: &str) -> Option<&ExportSchemaEntry> {
        self.entries.get(type_name)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.entries.contains_key(type_name)
    }

    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ExportError> {
        Ok(toml::from_str(content)?)
    }

    pub fn to_toml_string(&self) -> Result<String, ExportError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Schema covering cells, nodes, servers, clusters and JDBC resources
    pub fn builtin() -> Self {
        ExportSchema::new()
            .with_entry(
                "Server",
                ExportSchemaEntry::new(&["name"], &["processDefinitions"], &["JDBCProvider"]),
            )
            .with_entry(
                "Node",
                ExportSchemaEntry::new(
                    &["name"],
                    &["processDefinitions"],
                    &["Server", "JDBCProvider"],
                ),
            )
            .with_entry(
                "Cell",
                ExportSchemaEntry::new(
                    &["name"],
                    &["processDefinitions"],
                    &["Node", "ServerCluster", "JDBCProvider"],
                ),
            )
            .with_entry(
                "ServerCluster",
                ExportSchemaEntry::new(
                    &["name"],
                    &[
                        "description",
                        "preferLocal",
                        "nodeGroupName",
                        "enableHA",
                        "serverType",
                        "jsfProvider",
                        "clusterAddress",
                        "prefetchDWLMTable",
                        "members",
                    ],
                    &["JDBCProvider"],
                ),
            )
            .with_entry(
                "ClusterMember",
                ExportSchemaEntry::new(&["nodeName", "memberName"], &["weight", "uniqueId"], &[]),
            )
            .with_entry(
                "JDBCProvider",
                ExportSchemaEntry::new(
                    &["name"],
                    &[
                        "description",
                        "classpath",
                        "nativepath",
                        "providerType",
                        "propertySet",
                        "implementationClassName",
                        "xa",
                    ],
                    &["DataSource"],
                ),
            )
            .with_entry(
                "J2EEResourcePropertySet",
                ExportSchemaEntry::new(&[], &["resourceProperties"], &[]),
            )
            .with_entry(
                "J2EEResourceProperty",
                ExportSchemaEntry::new(&["name"], &["type", "value", "description"], &[]),
            )
            .with_entry(
                "DataSource",
                ExportSchemaEntry::new(
                    &["name"],
                    &[
                        "jndiName",
                        "statementCacheSize",
                        "logMissingTransactionContext",
                        "properties",
                        "propertySet",
                        "datasourceHelperClassname",
                        "authDataAlias",
                        "xaRecoveryAuthAlias",
                        "connectionPool",
                    ],
                    &[],
                ),
            )
            .with_entry(
                "ConnectionPool",
                ExportSchemaEntry::new(
                    &[],
                    &[
                        "connectionTimeout",
                        "maxConnections",
                        "minConnections",
                        "reapTime",
                        "unusedTimeout",
                        "agedTimeout",
                        "purgePolicy",
                        "numberOfSharedPoolPartitions",
                        "numberOfUnsharedPoolPartitions",
                        "numberOfFreePoolPartitions",
                        "freePoolDistributionTableSize",
                        "surgeThreshold",
                        "surgeCreationInterval",
                        "testConnection",
                        "testConnectionInterval",
                        "stuckTimerTime",
                        "stuckTime",
                        "stuckThreshold",
                        "properties",
                    ],
                    &[],
                ),
            )
            .with_entry(
                "JavaProcessDef",
                ExportSchemaEntry::new(&[], &["jvmEntries"], &[]),
            )
            .with_entry(
                "JavaVirtualMachine",
                ExportSchemaEntry::new(
                    &[],
                    &[
                        "initialHeapSize",
                        "maximumHeapSize",
                        "genericJvmArguments",
                        "bootClasspath",
                        "classpath",
                        "systemProperties",
                        "verboseModeClass",
                        "verboseModeGarbageCollection",
                        "verboseModeJNI",
                        "runHProf",
                        "hprofArguments",
                        "debugMode",
                        "debugArgs",
                        "disableJIT",
                        "internalClassAccessMode",
                    ],
                    &[],
                ),
            )
            .with_entry(
                "Property",
                ExportSchemaEntry::new(&["name"], &["value", "description"], &[]),
            )
    }
}
