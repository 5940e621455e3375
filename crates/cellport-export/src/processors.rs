//! Task processor registry and built-in processors
//!
//! Each deployment task the administrative system reports is dispatched by its
//! exact name to a processor. Tasks without a registered processor are not
//! exported. Processors write into the [`ManifestAccumulator`] of the running
//! export pass.
//!
//! Environment specific values (deployment targets, web servers, virtual hosts)
//! are replaced with placeholder tokens that an importer resolves against the
//! target environment.

use crate::assembler::ManifestAccumulator;
use crate::errors::ExportError;
use crate::task::{ColumnInfo, Task};
use ahash::AHashMap;
use cellport_manifest::{OptionValue, Row};

/// Deployment targets of the importing environment
pub const DEPLOYMENT_TARGETS_TOKEN: &str = "$[deploymentTargets]";
/// Deployment targets plus web servers, used for web modules
pub const DEPLOYMENT_TARGETS_AND_WEB_SERVERS_TOKEN: &str = "$[deploymentTargets]+$[webServers]";
pub const VIRTUAL_HOST_TOKEN: &str = "$[virtualHost]";
/// Matches any servlet init parameter description
pub const ANY_DESCRIPTION_TOKEN: &str = ".*";
/// Rendering of an absent value in an immutable column
pub const NULL_TOKEN: &str = "null";

pub const EJB_DESCRIPTOR_SUFFIX: &str = ",META-INF/ejb-jar.xml";
pub const WEB_DESCRIPTOR_SUFFIX: &str = ",WEB-INF/web.xml";

const RELOAD_INTERVAL: &str = "reloadInterval";
const DEFAULT_RELOAD_INTERVAL: &str = "3";
const INSTALLED_EAR_DESTINATION: &str = "installed.ear.destination";

/// Per-call settings handed to a processor
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessorOptions<'a> {
    /// Column whitelist of the registry entry
    pub columns: Option<&'a [String]>,
    /// Emit the `#<task>` diagnostic block
    pub diagnostics: bool,
}

/// A task transform
pub type Transform =
    fn(&Task, &mut ManifestAccumulator, &ProcessorOptions<'_>) -> Result<(), ExportError>;

/// A registered processor and its column whitelist
#[derive(Debug, Clone)]
pub struct ProcessorEntry {
    pub transform: Transform,
    pub columns: Option<Vec<String>>,
}

impl ProcessorEntry {
    pub fn new(transform: Transform, columns: Option<&[&str]>) -> Self {
        ProcessorEntry {
            transform,
            columns: columns.map(|cols| cols.iter().map(|c| (*c).to_string()).collect()),
        }
    }

    /// Generic processor projecting the given columns
    pub fn generic(columns: &[&str]) -> Self {
        Self::new(generic_options, Some(columns))
    }

    /// Generic processor without whitelist, only contributes diagnostics
    pub fn diagnostics_only() -> Self {
        Self::new(generic_options, None)
    }

    /// Run the transform for a task
    pub fn apply(
        &self,
        task: &Task,
        accumulator: &mut ManifestAccumulator,
        diagnostics: bool,
    ) -> Result<(), ExportError> {
        let options = ProcessorOptions {
            columns: self.columns.as_deref(),
            diagnostics,
        };
        (self.transform)(task, accumulator, &options)
    }
}

/// Task name to processor lookup table
#[derive(Debug, Clone, Default)]
pub struct ProcessorRegistry {
    entries: AHashMap<String, ProcessorEntry>,
}

impl ProcessorRegistry {
    /// Registry without any processor
    pub fn empty() -> Self {
        Self::default()
    }

    /// Add or replace a processor; custom entries override defaults
    pub fn with_entry(mut self, task_name: &str, entry: ProcessorEntry) -> Self {
        self.insert(task_name, entry);
        self
    }

    pub fn insert(&mut self, task_name: &str, entry: ProcessorEntry) {
        self.entries.insert(task_name.to_string(), entry);
    }

    pub fn get(&self, task_name: &str) -> Option<&ProcessorEntry> {
        self.entries.get(task_name)
    }

    /// Registered task names, sorted
    pub fn task_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registry with every built-in processor
    pub fn with_defaults() -> Self {
        let mut registry = Self::empty();
        registry.insert(
            "AppDeploymentOptions",
            ProcessorEntry::new(app_deployment_options, None),
        );
        registry.insert(
            "MapModulesToServers",
            ProcessorEntry::new(map_modules_to_servers, Some(&["module", "uri", "server"])),
        );
        registry.insert(
            "MapWebModToVH",
            ProcessorEntry::new(map_web_mod_to_vh, Some(&["webModule", "uri", "virtualHost"])),
        );
        registry.insert(
            "MapInitParamForServlet",
            ProcessorEntry::new(map_init_param_for_servlet, None),
        );
        for (task_name, columns) in GENERIC_TASKS {
            registry.insert(task_name, ProcessorEntry::generic(columns));
        }
        for task_name in DIAGNOSTIC_ONLY_TASKS {
            registry.insert(task_name, ProcessorEntry::diagnostics_only());
        }
        registry
    }
}

/// Tasks handled by the generic processor and their exported columns
const GENERIC_TASKS: &[(&str, &[&str])] = &[
    ("CtxRootForWebMod", &["webModule", "uri", "web.contextroot"]),
    (
        "MapRolesToUsers",
        &["role", "role.everyone", "role.all.auth.user", "role.user", "role.group"],
    ),
    ("MapRunAsRolesToUsers", &["role", "userName", "password"]),
    (
        "BindJndiForEJBNonMessageBinding",
        &["EJBModule", "EJB", "uri", "JNDI", "localHomeJndi", "remoteHomeJndi"],
    ),
    (
        "BindJndiForEJBMessageBinding",
        &["EJBModule", "EJB", "uri", "listenerPort", "JNDI", "jndi.dest", "actspec.auth"],
    ),
    (
        "BindJndiForEJBBusiness",
        &["EJBModule", "EJB", "uri", "ejbBusinessInterface", "ejbBusinessInterfaceJndi"],
    ),
    (
        "MapEJBRefToEJB",
        &["module", "EJB", "uri", "referenceBinding", "class", "JNDI"],
    ),
    (
        "MapResRefToEJB",
        &[
            "module",
            "EJB",
            "uri",
            "referenceBinding",
            "resRef.type",
            "JNDI",
            "login.config.name",
            "auth.props",
            "dataSourceProps",
        ],
    ),
    (
        "MapResEnvRefToRes",
        &["module", "EJB", "uri", "referenceBinding", "resEnvRef.type", "JNDI"],
    ),
    (
        "DataSourceFor10EJBModules",
        &["EJBModule", "uri", "JNDI", "userName", "password", "login.config.name", "auth.props"],
    ),
    (
        "DataSourceFor20EJBModules",
        &["EJBModule", "uri", "JNDI", "resAuth", "login.config.name", "auth.props", "dataSourceProps"],
    ),
    (
        "DataSourceFor10CMPBeans",
        &[
            "EJBModule",
            "EJB",
            "uri",
            "JNDI",
            "userName",
            "password",
            "login.config.name",
            "auth.props",
        ],
    ),
    (
        "DataSourceFor20CMPBeans",
        &["EJBModule", "EJB", "uri", "JNDI", "resAuth", "login.config.name", "auth.props"],
    ),
    (
        "MapEnvEntryForEJBMod",
        &["EJBModule", "uri", "EJB", "prop.name", "prop.type", "prop.description", "prop.value"],
    ),
    (
        "MapEnvEntryForWebMod",
        &["webModule", "uri", "prop.name", "prop.type", "prop.description", "prop.value"],
    ),
    (
        "EnsureMethodProtectionFor10EJB",
        &["EJBModule", "uri", "method.denyAllAccessPermission"],
    ),
    (
        "EnsureMethodProtectionFor20EJB",
        &["EJBModule", "uri", "method.protectionType"],
    ),
    (
        "CorrectOracleIsolationLevel",
        &["module", "referenceBinding", "JNDI", "isolationLevel"],
    ),
    (
        "MapMessageDestinationRefToEJB",
        &["module", "EJB", "uri", "messageDestinationObject", "JNDI"],
    ),
    ("BackendIdSelection", &["EJBModule", "uri", "CurrentBackendId"]),
    ("MapSharedLibForMod", &["module", "uri", "sharedLibName"]),
    (
        "SharedLibRelationship",
        &["module", "uri", "relationship", "compUnitName", "matchTarget"],
    ),
    (
        "JSPCompileOptions",
        &[
            "webModule",
            "uri",
            "jsp.classpath",
            "useFullPackageNames",
            "jdkSourceLevel",
            "disableJspRuntimeCompilation",
        ],
    ),
    ("ActSpecJNDI", &["RARModule", "uri", "j2cid", "j2c.jndiName"]),
    (
        "MetadataCompleteForModules",
        &["module", "uri", "lockDeploymentDescriptor"],
    ),
    (
        "CustomActivationPlan",
        &["module", "uri", "activation.plan.add", "activation.plan.remove"],
    ),
    (
        "WebServicesServerBindPort",
        &[
            "webservices.cfgbnd_Module_Name",
            "webservices.cfgbnd_Web_Service",
            "webservices.cfgbnd_Port",
            "webservices.cfgbnd_Scope",
        ],
    ),
    (
        "WebServicesServerCustomProperty",
        &[
            "webservices.cfgbnd_Module_Name",
            "webservices.cfgbnd_Web_Service",
            "webservices.cfgbnd_Port",
            "webservices.cfgbnd_Property",
            "webservices.cfgbnd_Value",
        ],
    ),
    (
        "WebServicesClientBindPortInfo",
        &[
            "webservices.cfgbnd_Module_Name",
            "webservices.cfgbnd_EJB",
            "webservices.cfgbnd_Web_Service",
            "webservices.cfgbnd_Port",
            "webservices.cfgbnd_Timeout",
            "webservices.cfgbnd_BasicAuth_ID",
            "webservices.cfgbnd_BasicAuth_Password",
            "webservices.cfgbnd_SSL_Config",
            "webservices.cfgbnd_Overridden_Endpoint",
            "webservices.cfgbnd_Overridden_BindingNamespace",
        ],
    ),
    (
        "WebServicesClientBindDeployedWSDL",
        &[
            "webservices.cfgbnd_Module_Name",
            "webservices.cfgbnd_EJB",
            "webservices.cfgbnd_Web_Service",
            "webservices.cfgbnd_Deployed_WSDL",
        ],
    ),
    (
        "WebServicesClientBindPreferredPort",
        &[
            "webservices.cfgbnd_Module_Name",
            "webservices.cfgbnd_EJB",
            "webservices.cfgbnd_Web_Service",
            "webservices.cfgbnd_Port_Type",
            "webservices.cfgbnd_Port",
        ],
    ),
    (
        "WebServicesClientCustomProperty",
        &[
            "webservices.cfgbnd_Module_Name",
            "webservices.cfgbnd_EJB",
            "webservices.cfgbnd_Web_Service",
            "webservices.cfgbnd_Port",
            "webservices.cfgbnd_Property",
            "webservices.cfgbnd_Value",
        ],
    ),
    (
        "EJBDeployOptions",
        &[
            "deployejb.classpath",
            "deployejb.rmic",
            "deployejb.dbtype",
            "deployejb.dbschema",
            "deployejb.complianceLevel",
            "deployejb.dbaccesstype",
            "deployejb.sqljclasspath",
        ],
    ),
    (
        "JSPReloadForWebMod",
        &["webModule", "uri", "jspReloadEnabled", "jspReloadInterval"],
    ),
    (
        "CorrectUseSystemIdentity",
        &["EJB", "EJBModule", "uri", "method.signature", "role", "userName", "password"],
    ),
    (
        "EmbeddedRar",
        &["RARModule", "uri", "j2ctype", "j2cid", "j2c.name", "j2c.jndiName"],
    ),
];

/// Tasks only reported through the diagnostic block
const DIAGNOSTIC_ONLY_TASKS: &[&str] = &[
    "MapJaspiProvider",
    "MapEnvEntryForClientMod",
    "MapEnvEntryForApp",
    "WebServicesPublishWSDLInfo",
];

// =============================================================================
// BUILT-IN PROCESSORS
// =============================================================================

/// Project the whitelisted columns of every row into `options[task]`
///
/// Absent values become `""` in mutable columns and `null` otherwise. Nothing
/// is written when the task has no rows.
pub fn generic_options(
    task: &Task,
    accumulator: &mut ManifestAccumulator,
    options: &ProcessorOptions<'_>,
) -> Result<(), ExportError> {
    if options.diagnostics {
        accumulator.set_extra(&format!("#{}", task.name()), diagnostic_rows(task));
    }

    let Some(columns) = options.columns.filter(|cols| !cols.is_empty()) else {
        return Ok(());
    };

    let mut rows: Vec<Row> = Vec::with_capacity(task.rows().len());
    for row in task.rows() {
        let mut projected = Vec::with_capacity(columns.len());
        for column in columns {
            let field = task.field(row, column)?;
            let value = match &field.value {
                Some(value) => value.clone(),
                None if field.mutable => String::new(),
                None => NULL_TOKEN.to_string(),
            };
            projected.push(value);
        }
        rows.push(projected);
    }

    if !rows.is_empty() {
        accumulator.set_option(task.name(), rows);
    }
    Ok(())
}

/// Column list, required and mutable subsets, then every raw row
fn diagnostic_rows(task: &Task) -> Vec<Row> {
    let mut rows = vec![
        flagged_columns(task, "#columns", |_| true),
        flagged_columns(task, "#requiredColumns", |info| info.required),
        flagged_columns(task, "#mutableColumns", |info| info.mutable),
    ];
    for row in task.rows() {
        let raw: Row = std::iter::once("#".to_string())
            .chain(row.fields().map(|(_, field)| {
                field.value.clone().unwrap_or_else(|| NULL_TOKEN.to_string())
            }))
            .collect();
        rows.push(raw);
    }
    rows
}

fn flagged_columns(task: &Task, marker: &str, keep: impl Fn(&ColumnInfo) -> bool) -> Row {
    std::iter::once(marker.to_string())
        .chain(
            task.column_names()
                .iter()
                .filter(|column| task.column_info(column).is_some_and(&keep))
                .cloned(),
        )
        .collect()
}

/// Copy the mutable settings of the single row into top-level options
pub fn app_deployment_options(
    task: &Task,
    accumulator: &mut ManifestAccumulator,
    _options: &ProcessorOptions<'_>,
) -> Result<(), ExportError> {
    let Some(first_row) = task.rows().first() else {
        return Ok(());
    };

    for column in task.column_names() {
        if !task.column_info(column).is_some_and(|info| info.mutable) {
            continue;
        }
        let value = match column.as_str() {
            INSTALLED_EAR_DESTINATION => continue,
            RELOAD_INTERVAL => {
                let value = task.text(first_row, column)?;
                if value.is_empty() {
                    DEFAULT_RELOAD_INTERVAL.to_string()
                } else {
                    value
                }
            }
            _ => task.text(first_row, column)?,
        };
        accumulator.set_option(column, value);
    }
    Ok(())
}

/// Module to server mapping with deployment target placeholders
pub fn map_modules_to_servers(
    task: &Task,
    accumulator: &mut ManifestAccumulator,
    _options: &ProcessorOptions<'_>,
) -> Result<(), ExportError> {
    let mut rows = Vec::with_capacity(task.rows().len());
    for row in task.rows() {
        let uri = task.text(row, "uri")?;
        let target = if uri.ends_with(EJB_DESCRIPTOR_SUFFIX) {
            DEPLOYMENT_TARGETS_TOKEN.to_string()
        } else if uri.ends_with(WEB_DESCRIPTOR_SUFFIX) {
            DEPLOYMENT_TARGETS_AND_WEB_SERVERS_TOKEN.to_string()
        } else {
            task.text(row, "server")?
        };
        rows.push(vec![task.text(row, "module")?, uri, target]);
    }
    accumulator.set_option("MapModulesToServers", rows);
    Ok(())
}

/// Web module to virtual host mapping, the host is always a placeholder
pub fn map_web_mod_to_vh(
    task: &Task,
    accumulator: &mut ManifestAccumulator,
    _options: &ProcessorOptions<'_>,
) -> Result<(), ExportError> {
    let mut rows = Vec::with_capacity(task.rows().len());
    for row in task.rows() {
        rows.push(vec![
            task.text(row, "webModule")?,
            task.text(row, "uri")?,
            VIRTUAL_HOST_TOKEN.to_string(),
        ]);
    }
    accumulator.set_option("MapWebModToVH", rows);
    Ok(())
}

/// Servlet init parameters as fixed six-field rows
pub fn map_init_param_for_servlet(
    task: &Task,
    accumulator: &mut ManifestAccumulator,
    _options: &ProcessorOptions<'_>,
) -> Result<(), ExportError> {
    let mut rows = Vec::with_capacity(task.rows().len());
    for row in task.rows() {
        rows.push(vec![
            task.text(row, "webModule")?,
            task.text(row, "uri")?,
            task.text(row, "web.servlet")?,
            task.text(row, "prop.name")?,
            ANY_DESCRIPTION_TOKEN.to_string(),
            task.text(row, "prop.value")?,
        ]);
    }
    accumulator.set_option("MapInitParamForServlet", rows);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::RawTask;

    fn owned(rows: &[&[&str]]) -> Vec<Row> {
        rows.iter()
            .map(|row| row.iter().map(|v| (*v).to_string()).collect())
            .collect()
    }

    /// Build a task from named columns; every column shares the given flags
    fn task(
        name: &str,
        columns: &[&str],
        mutable: bool,
        rows: &[&[Option<&str>]],
    ) -> Result<Task, ExportError> {
        let raw = RawTask {
            name: name.to_string(),
            column_names: columns.iter().map(|c| (*c).to_string()).collect(),
            mutable_columns: vec![mutable; columns.len()],
            required_columns: vec![false; columns.len()],
            task_data: std::iter::once(vec![None; columns.len()])
                .chain(
                    rows.iter()
                        .map(|row| row.iter().map(|v| v.map(str::to_string)).collect()),
                )
                .collect(),
        };
        Task::normalize(&raw)
    }

    fn table(accumulator: &ManifestAccumulator, key: &str) -> Option<Vec<Row>> {
        accumulator
            .options
            .get(key)
            .and_then(OptionValue::as_table)
            .map(<[Row]>::to_vec)
    }

    fn run(
        entry: &ProcessorEntry,
        task: &Task,
        diagnostics: bool,
    ) -> Result<ManifestAccumulator, ExportError> {
        let mut accumulator = ManifestAccumulator::new();
        entry.apply(task, &mut accumulator, diagnostics)?;
        Ok(accumulator)
    }

    #[test]
    fn test_generic_projects_whitelisted_columns() -> Result<(), ExportError> {
        let task = task(
            "MapSharedLibForMod",
            &["module", "uri", "sharedLibName", "description"],
            true,
            &[&[Some("m1"), Some("u1"), Some("lib1"), Some("unused")]],
        )?;
        let entry = ProcessorEntry::generic(&["module", "uri", "sharedLibName"]);
        let accumulator = run(&entry, &task, false)?;
        assert_eq!(
            table(&accumulator, "MapSharedLibForMod"),
            Some(owned(&[&["m1", "u1", "lib1"]]))
        );
        assert!(accumulator.extras.is_empty());
        Ok(())
    }

    #[test]
    fn test_generic_missing_values() -> Result<(), ExportError> {
        let columns = ["webModule", "uri", "web.contextroot"];
        let entry = ProcessorEntry::generic(&columns);
        let row: &[Option<&str>] = &[Some("Web"), None, None];

        let mutable = task("CtxRootForWebMod", &columns, true, &[row])?;
        assert_eq!(
            table(&run(&entry, &mutable, false)?, "CtxRootForWebMod"),
            Some(owned(&[&["Web", "", ""]]))
        );

        let immutable = task("CtxRootForWebMod", &columns, false, &[row])?;
        assert_eq!(
            table(&run(&entry, &immutable, false)?, "CtxRootForWebMod"),
            Some(owned(&[&["Web", "null", "null"]]))
        );
        Ok(())
    }

    #[test]
    fn test_generic_without_rows_writes_nothing() -> Result<(), ExportError> {
        let task = task("MapRolesToUsers", &["role"], true, &[])?;
        let accumulator = run(&ProcessorEntry::generic(&["role"]), &task, false)?;
        assert!(accumulator.options.is_empty());
        Ok(())
    }

    #[test]
    fn test_generic_unknown_column_is_error() -> Result<(), ExportError> {
        let task = task("MapRolesToUsers", &["role"], true, &[&[Some("admin")]])?;
        let result = run(&ProcessorEntry::generic(&["role", "role.user"]), &task, false);
        assert!(matches!(result, Err(ExportError::SchemaMismatch { .. })));
        Ok(())
    }

    #[test]
    fn test_generic_diagnostic_block() -> Result<(), ExportError> {
        let raw = RawTask {
            name: "MapEnvEntryForApp".to_string(),
            column_names: vec!["name".to_string(), "type".to_string(), "value".to_string()],
            mutable_columns: vec![false, false, true],
            required_columns: vec![true, false, false],
            task_data: vec![
                vec![None, None, None],
                vec![
                    Some("timeout".to_string()),
                    Some("java.lang.Integer".to_string()),
                    None,
                ],
            ],
        };
        let task = Task::normalize(&raw)?;
        let entry = ProcessorEntry::diagnostics_only();

        let accumulator = run(&entry, &task, true)?;
        assert!(accumulator.options.is_empty());
        let block = accumulator
            .extras
            .get("#MapEnvEntryForApp")
            .and_then(OptionValue::as_table)
            .map(<[Row]>::to_vec);
        assert_eq!(
            block,
            Some(owned(&[
                &["#columns", "name", "type", "value"],
                &["#requiredColumns", "name"],
                &["#mutableColumns", "value"],
                &["#", "timeout", "java.lang.Integer", "null"],
            ]))
        );

        assert!(run(&entry, &task, false)?.extras.is_empty());
        Ok(())
    }

    #[test]
    fn test_app_deployment_options_reload_interval() -> Result<(), ExportError> {
        let columns = ["reloadInterval", "installed.ear.destination", "distributeApp", "appname"];
        let entry = ProcessorEntry::new(app_deployment_options, None);

        for (reload, expected) in [(Some(""), "3"), (None, "3"), (Some("7"), "7")] {
            let raw = RawTask {
                name: "AppDeploymentOptions".to_string(),
                column_names: columns.iter().map(|c| (*c).to_string()).collect(),
                mutable_columns: vec![true, true, true, false],
                required_columns: vec![false; 4],
                task_data: vec![
                    vec![None; 4],
                    vec![
                        reload.map(str::to_string),
                        Some("/opt/apps".to_string()),
                        Some("true".to_string()),
                        Some("shop".to_string()),
                    ],
                ],
            };
            let accumulator = run(&entry, &Task::normalize(&raw)?, false)?;
            let scalar = |key: &str| {
                accumulator
                    .options
                    .get(key)
                    .and_then(OptionValue::as_scalar)
                    .map(str::to_string)
            };
            assert_eq!(scalar("reloadInterval").as_deref(), Some(expected));
            assert_eq!(scalar("distributeApp").as_deref(), Some("true"));
            assert!(scalar("installed.ear.destination").is_none());
            assert!(scalar("appname").is_none());
        }
        Ok(())
    }

    #[test]
    fn test_app_deployment_options_without_rows() -> Result<(), ExportError> {
        let task = task("AppDeploymentOptions", &["reloadInterval"], true, &[])?;
        let accumulator = run(&ProcessorEntry::new(app_deployment_options, None), &task, false)?;
        assert!(accumulator.options.is_empty());
        Ok(())
    }

    #[test]
    fn test_map_modules_to_servers_placeholders() -> Result<(), ExportError> {
        let task = task(
            "MapModulesToServers",
            &["module", "uri", "server"],
            true,
            &[
                &[Some("Shop Web"), Some("shop.war,WEB-INF/web.xml"), Some("cell=a,server=s1")],
                &[
                    Some("Shop EJB"),
                    Some("shop-ejb.jar,META-INF/ejb-jar.xml"),
                    Some("cell=a,server=s1"),
                ],
                &[Some("Shop RAR"), Some("shop.rar,META-INF/ra.xml"), Some("cell=a,server=s2")],
            ],
        )?;
        let accumulator = run(&ProcessorEntry::new(map_modules_to_servers, None), &task, false)?;
        let targets: Vec<String> = table(&accumulator, "MapModulesToServers")
            .unwrap_or_default()
            .into_iter()
            .filter_map(|row| row.get(2).cloned())
            .collect();
        assert_eq!(
            targets,
            vec![
                DEPLOYMENT_TARGETS_AND_WEB_SERVERS_TOKEN.to_string(),
                DEPLOYMENT_TARGETS_TOKEN.to_string(),
                "cell=a,server=s2".to_string(),
            ]
        );
        Ok(())
    }

    #[test]
    fn test_fixed_key_processors_write_when_empty() -> Result<(), ExportError> {
        let vh = task("MapWebModToVH", &["webModule", "uri", "virtualHost"], true, &[])?;
        let accumulator = run(&ProcessorEntry::new(map_web_mod_to_vh, None), &vh, false)?;
        assert_eq!(table(&accumulator, "MapWebModToVH"), Some(Vec::new()));

        let modules = task("MapModulesToServers", &["module", "uri", "server"], true, &[])?;
        let accumulator = run(&ProcessorEntry::new(map_modules_to_servers, None), &modules, false)?;
        assert_eq!(table(&accumulator, "MapModulesToServers"), Some(Vec::new()));
        Ok(())
    }

    #[test]
    fn test_virtual_host_placeholder() -> Result<(), ExportError> {
        let vh = task(
            "MapWebModToVH",
            &["webModule", "uri", "virtualHost"],
            true,
            &[&[Some("Shop Web"), Some("shop.war,WEB-INF/web.xml"), Some("default_host")]],
        )?;
        let accumulator = run(&ProcessorEntry::new(map_web_mod_to_vh, None), &vh, false)?;
        assert_eq!(
            table(&accumulator, "MapWebModToVH"),
            Some(owned(&[&["Shop Web", "shop.war,WEB-INF/web.xml", VIRTUAL_HOST_TOKEN]]))
        );
        Ok(())
    }

    #[test]
    fn test_init_param_rows() -> Result<(), ExportError> {
        let params = task(
            "MapInitParamForServlet",
            &["webModule", "uri", "web.servlet", "prop.name", "prop.description", "prop.value"],
            true,
            &[&[
                Some("Shop Web"),
                Some("shop.war,WEB-INF/web.xml"),
                Some("CartServlet"),
                Some("cacheSize"),
                Some("size of the cart cache"),
                Some("64"),
            ]],
        )?;
        let entry = ProcessorEntry::new(map_init_param_for_servlet, None);
        let accumulator = run(&entry, &params, false)?;
        assert_eq!(
            table(&accumulator, "MapInitParamForServlet"),
            Some(owned(&[&[
                "Shop Web",
                "shop.war,WEB-INF/web.xml",
                "CartServlet",
                "cacheSize",
                ".*",
                "64",
            ]]))
        );
        Ok(())
    }

    #[test]
    fn test_default_registry() {
        let registry = ProcessorRegistry::with_defaults();
        assert_eq!(
            registry.len(),
            4 + GENERIC_TASKS.len() + DIAGNOSTIC_ONLY_TASKS.len()
        );
        assert!(registry.get("MapTargetMappings").is_none());
        assert!(registry
            .get("MapJaspiProvider")
            .is_some_and(|entry| entry.columns.is_none()));
        assert!(registry
            .get("CtxRootForWebMod")
            .and_then(|entry| entry.columns.as_deref())
            .is_some_and(|cols| cols == ["webModule", "uri", "web.contextroot"]));

        let names = registry.task_names();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
    }

    #[test]
    fn test_custom_entry_overrides_default() {
        let registry = ProcessorRegistry::with_defaults()
            .with_entry("MapWebModToVH", ProcessorEntry::generic(&["webModule", "virtualHost"]));
        assert!(registry
            .get("MapWebModToVH")
            .and_then(|entry| entry.columns.as_deref())
            .is_some_and(|cols| cols == ["webModule", "virtualHost"]));
    }
}
