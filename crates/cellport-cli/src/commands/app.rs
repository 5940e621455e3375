use crate::common::{emit, output_path, read_snapshot, GlobalOpts, OutputFormat};
use crate::logger;
use anyhow::Context;
use cellport_config::Config;
use cellport_export::{ManifestAssembler, ProcessorRegistry, Snapshot, TracingSink};
use cellport_manifest::{render_application, render_json, ApplicationManifest};
use clap::Args;
use std::path::PathBuf;

/// Export the deployment manifest of one application
#[derive(Args, Debug, Clone)]
pub struct AppCommand {
    /// Snapshot of the administrative system (JSON)
    pub snapshot: PathBuf,
    /// Name of the deployed application
    pub app_name: String,
    /// Write the manifest to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Include the raw task blocks of generic processors
    #[arg(long)]
    pub diagnostics: bool,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn handle_app(cmd: AppCommand, _opts: &GlobalOpts, config: &Config) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&cmd.snapshot)?;

    logger::spinner_start(&format!("Exporting {}", cmd.app_name));
    let (manifest, content) = match export_application(&cmd, &snapshot, config) {
        Ok(exported) => exported,
        Err(e) => {
            logger::spinner_error(&format!("Export of {} failed", cmd.app_name));
            return Err(e);
        }
    };

    let Some(path) = output_path(cmd.output, config, &cmd.app_name, cmd.format) else {
        logger::spinner_stop();
        return emit(&content, None);
    };
    if let Err(e) = emit(&content, Some(path.as_path())) {
        logger::spinner_error(&format!("Export of {} failed", cmd.app_name));
        return Err(e);
    }
    logger::spinner_success(&format!(
        "Exported {} ({} options) to {}",
        manifest.app_name,
        manifest.options.len(),
        path.display()
    ));
    Ok(())
}

/// Assemble and render the manifest, nothing is written yet
fn export_application(
    cmd: &AppCommand,
    snapshot: &Snapshot,
    config: &Config,
) -> anyhow::Result<(ApplicationManifest, String)> {
    let registry = ProcessorRegistry::with_defaults();
    let sink = TracingSink;
    let manifest = ManifestAssembler::new(&registry, &sink)
        .with_diagnostics(cmd.diagnostics || config.diagnostics_enabled())
        .assemble(&cmd.app_name, snapshot, snapshot)
        .with_context(|| format!("Failed to export application {}", cmd.app_name))?;
    let content = match cmd.format {
        OutputFormat::Text => render_application(&manifest)?,
        OutputFormat::Json => render_json(&manifest)?,
    };
    Ok((manifest, content))
}
