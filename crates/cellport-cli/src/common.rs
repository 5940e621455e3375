//! Common types and helpers shared across commands

use anyhow::Context;
use cellport_config::Config;
use cellport_export::{ExportSchema, Snapshot};
use clap::{Parser, ValueEnum};
use std::fs;
use std::path::{Path, PathBuf};

/// Global CLI options available to all commands
#[derive(Parser, Debug, Clone, Default)]
pub struct GlobalOpts {
    #[arg(short, long, global = true, help = "Decrease verbosity")]
    pub quiet: bool,

    #[arg(short, long, global = true, action = clap::ArgAction::Count, help = "Increase verbosity (-v for debug, -vv for trace)")]
    pub verbose: u8,
}

impl GlobalOpts {
    /// Get the effective verbosity level
    /// - 0: quiet/warn only
    /// - 1: debug (-v)
    /// - 2: trace (-vv)
    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}

/// Rendering of an exported manifest
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Tab-indented manifest text
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Text => "manifest",
            OutputFormat::Json => "json",
        }
    }
}

pub fn read_snapshot(path: &Path) -> anyhow::Result<Snapshot> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    Snapshot::from_json_str(&content)
        .with_context(|| format!("Invalid snapshot {}", path.display()))
}

/// Export schema from the command line, the configuration, or the built-in one
pub fn load_schema(explicit: Option<&Path>, config: &Config) -> anyhow::Result<ExportSchema> {
    let path = explicit
        .map(Path::to_path_buf)
        .or_else(|| config.export_schema.as_ref().map(PathBuf::from));
    let Some(path) = path else {
        return Ok(ExportSchema::builtin());
    };

    tracing::debug!("loading export schema from {}", path.display());
    let content = fs::read_to_string(&path)
        .with_context(|| format!("Failed to read export schema {}", path.display()))?;
    ExportSchema::from_toml_str(&content)
        .with_context(|| format!("Invalid export schema {}", path.display()))
}

/// Where a rendered manifest goes: the explicit path, the configured output
/// directory, or stdout when neither is set
pub fn output_path(
    explicit: Option<PathBuf>,
    config: &Config,
    stem: &str,
    format: OutputFormat,
) -> Option<PathBuf> {
    explicit.or_else(|| {
        config
            .output_dir
            .as_ref()
            .map(|dir| PathBuf::from(dir).join(format!("{}.{}", stem, format.extension())))
    })
}

/// Write rendered content to a file, or print it
pub fn emit(content: &str, destination: Option<&Path>) -> anyhow::Result<()> {
    match destination {
        Some(path) => cellport_manifest::write_to_path(content, path)
            .with_context(|| format!("Failed to write {}", path.display())),
        None => {
            print!("{}", content);
            Ok(())
        }
    }
}
