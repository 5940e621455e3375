//! Manifest writer
//!
//! Renders manifests to the tab-indented text format:
//!
//! ```text
//! shop ../applications/shop.ear
//! 	reloadInterval 3
//! 	MapWebModToVH
//! 		Shop Web;shop.war,WEB-INF/web.xml;$[virtualHost]
//! 	*startingWeight 1
//! ```
//!
//! Configuration nodes put the type name on its own line, keys prefixed with
//! `*`, attributes prefixed with `-` and children one level deeper.
//! A manifest is only persisted after it has been rendered completely.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::errors::ManifestError;
use crate::types::{ApplicationManifest, AttributeNodeValue, ManifestObjectNode, OptionValue, Row};

/// Render an application manifest
pub fn render_application(manifest: &ApplicationManifest) -> Result<String, ManifestError> {
    let mut out = String::new();
    push_line(
        &mut out,
        0,
        &format!("{} {}", manifest.app_name, manifest.artifact_path),
    )?;
    for (name, value) in &manifest.options {
        push_option(&mut out, name, value)?;
    }
    for (name, value) in &manifest.extras {
        push_option(&mut out, &format!("*{}", name), value)?;
    }
    Ok(out)
}

/// Render one configuration tree
pub fn render_config(node: &ManifestObjectNode) -> Result<String, ManifestError> {
    let mut out = String::new();
    push_node(&mut out, node, 0)?;
    Ok(out)
}

/// Render any manifest value as pretty JSON
pub fn render_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<String, ManifestError> {
    let mut json = serde_json::to_string_pretty(value)?;
    json.push('\n');
    Ok(json)
}

/// Write rendered manifest text to a path
///
/// The content goes to a temporary sibling first and is renamed into place,
/// so readers never observe a partially written manifest.
pub fn write_to_path(content: &str, output_path: &Path) -> Result<(), ManifestError> {
    debug!("Writing manifest to: {:?}", output_path);

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut temp_name = output_path.as_os_str().to_owned();
    temp_name.push(".tmp");
    let temp_path = PathBuf::from(temp_name);
    {
        let file = fs::File::create(&temp_path)?;
        let mut writer = std::io::BufWriter::new(file);
        writer.write_all(content.as_bytes())?;
        writer.flush()?;
    }
    fs::rename(&temp_path, output_path)?;

    info!("Manifest written to: {:?}", output_path);
    Ok(())
}

fn push_option(out: &mut String, name: &str, value: &OptionValue) -> Result<(), ManifestError> {
    match value {
        OptionValue::Scalar(text) => push_line(out, 1, &key_value(name, text)),
        OptionValue::Table(rows) => {
            push_line(out, 1, name)?;
            for row in rows {
                push_line(out, 2, &join_row(row))?;
            }
            Ok(())
        }
    }
}

fn push_node(out: &mut String, node: &ManifestObjectNode, depth: usize) -> Result<(), ManifestError> {
    push_line(out, depth, &node.type_name)?;
    for (name, value) in &node.keys {
        push_line(out, depth + 1, &key_value(&format!("*{}", name), value))?;
    }
    for (name, value) in node.ordered_attributes() {
        let label = format!("-{}", name);
        match value {
            AttributeNodeValue::Text(text) => push_line(out, depth + 1, &key_value(&label, text))?,
            AttributeNodeValue::Object(nested) => {
                push_line(out, depth + 1, &label)?;
                push_node(out, nested, depth + 2)?;
            }
            AttributeNodeValue::List(nested) => {
                push_line(out, depth + 1, &label)?;
                for item in nested {
                    push_node(out, item, depth + 2)?;
                }
            }
        }
    }
    for child in &node.children {
        push_node(out, child, depth + 1)?;
    }
    Ok(())
}

// Empty values keep the separator, a bare name is a table header
fn key_value(name: &str, value: &str) -> String {
    format!("{} {}", name, value)
}

fn join_row(row: &Row) -> String {
    row.join(";")
}

fn push_line(out: &mut String, depth: usize, text: &str) -> Result<(), ManifestError> {
    if text.contains(['\n', '\r']) {
        return Err(ManifestError::InvalidManifest(format!(
            "value contains a line break: {:?}",
            text
        )));
    }
    for _ in 0..depth {
        out.push('\t');
    }
    out.push_str(text);
    out.push('\n');
    Ok(())
}
