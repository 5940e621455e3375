use cellport_export::{ExportSchema, ProcessorRegistry};
use clap::Args;

/// Print the built-in export schema
#[derive(Args, Debug, Clone)]
pub struct SchemaCommand {
    /// List the deployment tasks with a built-in processor instead
    #[arg(long)]
    pub tasks: bool,
}

pub fn handle_schema(cmd: SchemaCommand) -> anyhow::Result<()> {
    if cmd.tasks {
        let registry = ProcessorRegistry::with_defaults();
        for name in registry.task_names() {
            println!("{}", name);
        }
        return Ok(());
    }
    print!("{}", ExportSchema::builtin().to_toml_string()?);
    Ok(())
}
