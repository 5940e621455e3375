use crate::common::{emit, load_schema, output_path, read_snapshot, GlobalOpts, OutputFormat};
use crate::logger;
use anyhow::Context;
use cellport_config::Config;
use cellport_export::ConfigExporter;
use cellport_manifest::{render_config, render_json};
use clap::Args;
use std::path::PathBuf;

/// Export configuration objects and everything below them
#[derive(Args, Debug, Clone)]
pub struct ConfigExportCommand {
    /// Snapshot of the administrative system (JSON)
    pub snapshot: PathBuf,
    /// Ids of the root objects to export
    #[arg(required = true)]
    pub object_ids: Vec<String>,
    /// Export schema (TOML) replacing the built-in one
    #[arg(long)]
    pub schema: Option<PathBuf>,
    /// Write the manifest to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

pub fn handle_config_export(
    cmd: ConfigExportCommand,
    _opts: &GlobalOpts,
    config: &Config,
) -> anyhow::Result<()> {
    let snapshot = read_snapshot(&cmd.snapshot)?;
    let schema = load_schema(cmd.schema.as_deref(), config)?;
    let roots = snapshot.objects(&cmd.object_ids)?;

    let nodes = ConfigExporter::new(&snapshot, &schema)
        .export_all(&roots)
        .context("Failed to export configuration")?;
    logger::debug(&format!(
        "exported {} objects",
        nodes.iter().map(|node| node.node_count()).sum::<usize>()
    ));

    let content = match cmd.format {
        OutputFormat::Text => {
            let mut out = String::new();
            for node in &nodes {
                out.push_str(&render_config(node)?);
            }
            out
        }
        OutputFormat::Json => render_json(&nodes)?,
    };

    let stem = cmd.object_ids.first().map_or("config", String::as_str);
    let destination = output_path(cmd.output, config, stem, cmd.format);
    emit(&content, destination.as_deref())?;
    if let Some(path) = destination {
        logger::success(&format!("Exported {} root objects to {}", nodes.len(), path.display()));
    }
    Ok(())
}
