//! Deployment manifest assembler
//!
//! One assembly pass per application: deployment metadata first, then every
//! deployment task through its registered processor, then the tables are
//! sorted so the manifest is independent of the order the source reported.

use crate::admin::{DeploymentMetadata, OptionalBlock, TaskSource};
use crate::diagnostics::{Diagnostic, DiagnosticSink};
use crate::errors::ExportError;
use crate::processors::ProcessorRegistry;
use crate::task::Task;
use cellport_manifest::{ApplicationManifest, OptionValue, Row};
use indexmap::IndexMap;
use tracing::{debug, info};

/// Options and extras collected during one assembly pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestAccumulator {
    pub options: IndexMap<String, OptionValue>,
    pub extras: IndexMap<String, OptionValue>,
}

impl ManifestAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_option(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.options.insert(key.to_string(), value.into());
    }

    pub fn set_extra(&mut self, key: &str, value: impl Into<OptionValue>) {
        self.extras.insert(key.to_string(), value.into());
    }

    /// Build the manifest, every table sorted row-wise
    pub fn finalize(self, app_name: &str) -> ApplicationManifest {
        let mut manifest = ApplicationManifest::new(app_name);
        manifest.options = self.options;
        manifest.extras = self.extras;
        manifest.sort_tables();
        manifest
    }
}

/// Builds application manifests from deployment metadata and tasks
pub struct ManifestAssembler<'a> {
    registry: &'a ProcessorRegistry,
    sink: &'a dyn DiagnosticSink,
    diagnostics: bool,
}

impl<'a> ManifestAssembler<'a> {
    pub fn new(registry: &'a ProcessorRegistry, sink: &'a dyn DiagnosticSink) -> Self {
        ManifestAssembler {
            registry,
            sink,
            diagnostics: false,
        }
    }

    /// Also emit the `#<task>` diagnostic blocks of generic processors
    pub fn with_diagnostics(mut self, diagnostics: bool) -> Self {
        self.diagnostics = diagnostics;
        self
    }

    pub fn assemble<M, S>(
        &self,
        app_name: &str,
        metadata: &M,
        tasks: &S,
    ) -> Result<ApplicationManifest, ExportError>
    where
        M: DeploymentMetadata + ?Sized,
        S: TaskSource + ?Sized,
    {
        info!("assembling manifest for {}", app_name);
        let mut accumulator = ManifestAccumulator::new();

        self.add_deployment_extras(app_name, metadata, &mut accumulator)?;

        for raw in tasks.application_tasks(app_name)? {
            let Some(entry) = self.registry.get(&raw.name) else {
                self.sink.report(Diagnostic::TaskSkipped { task: raw.name });
                continue;
            };
            let task = Task::normalize(&raw)?;
            entry.apply(&task, &mut accumulator, self.diagnostics)?;
            self.sink.report(Diagnostic::TaskProcessed {
                task: raw.name,
                rows: task.rows().len(),
            });
        }

        let manifest = accumulator.finalize(app_name);
        debug!(
            "manifest for {} has {} options and {} extras",
            app_name,
            manifest.options.len(),
            manifest.extras.len()
        );
        Ok(manifest)
    }

    fn add_deployment_extras<M: DeploymentMetadata + ?Sized>(
        &self,
        app_name: &str,
        metadata: &M,
        accumulator: &mut ManifestAccumulator,
    ) -> Result<(), ExportError> {
        let deployment = metadata.deployment(app_name)?;
        accumulator.set_extra("startingWeight", deployment.starting_weight.to_string());
        accumulator.set_extra("classLoadingMode", deployment.class_loading_mode);

        let web_modules: Vec<Row> = deployment
            .modules
            .iter()
            .filter(|module| module.is_web_module())
            .map(|module| vec![module.uri.clone(), module.classloader_mode.clone()])
            .collect();
        if !web_modules.is_empty() {
            accumulator.set_extra("webModuleClassLoadingMode", web_modules);
        }

        for block in OptionalBlock::ALL {
            match metadata.optional_block(app_name, block) {
                Ok(rows) if rows.is_empty() => {}
                Ok(rows) => accumulator.set_extra(block.key(), rows),
                Err(err) => self.sink.report(Diagnostic::FeatureUnsupported {
                    feature: block.key().to_string(),
                    reason: err.to_string(),
                }),
            }
        }
        Ok(())
    }
}
