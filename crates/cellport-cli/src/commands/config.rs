use crate::logger;
use crate::GlobalOpts;
use anyhow::Context;
use cellport_config::{Config, KEYS};
use clap::Subcommand;
use colored::*;

#[derive(Subcommand, Debug, Clone)]
pub enum ConfigAction {
    /// Show the configured values
    Show,
    /// Set a configuration value
    Set { key: String, value: String },
    /// Remove a configuration value
    Unset { key: String },
    /// Print the path of the configuration file
    Path,
}

pub fn handle_config(action: ConfigAction, opts: &GlobalOpts) -> anyhow::Result<()> {
    let config_path = Config::path()?;
    logger::debug(&format!("Reading config from: {}", config_path.display()));

    match action {
        ConfigAction::Show => {
            let config = Config::load_from_path(&config_path).context("Failed to load config")?;
            println!("{}", "Configuration:".bold().green());
            if config.is_empty() {
                if opts.verbosity_level() > 0 {
                    println!("  {}", "(empty)".yellow());
                }
            } else {
                for (key, value) in config.values_iter() {
                    println!("  {}: {}", key.cyan(), value);
                }
            }
        }
        ConfigAction::Set { key, value } => {
            let mut config =
                Config::load_from_path(&config_path).context("Failed to load config")?;
            config.set(&key, value.clone()).with_context(|| {
                format!("Currently supported keys: {}", KEYS.join(", "))
            })?;
            config
                .save_to_path(&config_path)
                .context("Failed to save config")?;
            logger::success(&format!("Set {} = {}", key, value));
        }
        ConfigAction::Unset { key } => {
            let mut config =
                Config::load_from_path(&config_path).context("Failed to load config")?;
            config.unset(&key)?;
            config
                .save_to_path(&config_path)
                .context("Failed to save config")?;
            logger::success(&format!("Unset {}", key));
        }
        ConfigAction::Path => {
            println!("{}", config_path.display());
        }
    }
    Ok(())
}
