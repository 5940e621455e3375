use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable overriding the configuration file location
pub const CONFIG_ENV_VAR: &str = "CELLPORT_CONFIG";

/// Keys accepted by [`Config::get`] and [`Config::set`]
pub const KEYS: [&str; 3] = ["export-schema", "output-dir", "diagnostics"];

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// TOML export schema used instead of the built-in one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_schema: Option<String>,
    /// Directory manifests are written to when no output file is given
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnostics: Option<bool>,
}

impl Config {
    pub fn path() -> Result<PathBuf, ConfigError> {
        // Explicit override for tests and isolated runs
        if let Ok(env_path) = std::env::var(CONFIG_ENV_VAR) {
            let trimmed = env_path.trim();
            if !trimmed.is_empty() {
                return Ok(PathBuf::from(trimmed));
            }
        }

        #[cfg(not(target_os = "windows"))]
        let base = dirs::home_dir().map(|home| home.join(".config"));

        #[cfg(target_os = "windows")]
        let base = dirs::config_dir();

        base.map(|dir| dir.join("cellport").join("cellport.toml"))
            .ok_or(ConfigError::NoHomeDir)
    }

    /// Load the configuration, defaults when the file does not exist
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from_path(&Self::path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            Ok(toml::from_str(&content)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to_path(&Self::path()?)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "export-schema" => self.export_schema.clone(),
            "output-dir" => self.output_dir.clone(),
            "diagnostics" => self.diagnostics.map(|flag| flag.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: String) -> Result<(), ConfigError> {
        match key {
            "export-schema" => self.export_schema = Some(value),
            "output-dir" => self.output_dir = Some(value),
            "diagnostics" => {
                let flag = value.parse::<bool>().map_err(|_| ConfigError::InvalidValue {
                    key: key.to_string(),
                    value: value.clone(),
                    reason: "expected true or false".to_string(),
                })?;
                self.diagnostics = Some(flag);
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn unset(&mut self, key: &str) -> Result<(), ConfigError> {
        match key {
            "export-schema" => self.export_schema = None,
            "output-dir" => self.output_dir = None,
            "diagnostics" => self.diagnostics = None,
            _ => return Err(ConfigError::UnknownKey(key.to_string())),
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.export_schema.is_none() && self.output_dir.is_none() && self.diagnostics.is_none()
    }

    /// Configured values in key order
    pub fn values_iter(&self) -> Vec<(&'static str, String)> {
        KEYS.iter()
            .filter_map(|key| self.get(key).map(|value| (*key, value)))
            .collect()
    }

    pub fn diagnostics_enabled(&self) -> bool {
        self.diagnostics.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_new() {
        let config = Config::default();
        assert!(config.is_empty());
        assert!(!config.diagnostics_enabled());
    }

    #[test]
    fn test_config_set_get() {
        let mut config = Config::default();
        assert!(config.set("output-dir", "/tmp/manifests".to_string()).is_ok());
        assert_eq!(config.get("output-dir"), Some("/tmp/manifests".to_string()));
        assert!(!config.is_empty());
    }

    #[test]
    fn test_config_diagnostics_flag() {
        let mut config = Config::default();
        assert!(config.set("diagnostics", "true".to_string()).is_ok());
        assert!(config.diagnostics_enabled());
        assert_eq!(config.get("diagnostics"), Some("true".to_string()));

        let result = config.set("diagnostics", "sometimes".to_string());
        assert!(matches!(result, Err(ConfigError::InvalidValue { .. })));
        assert!(config.diagnostics_enabled());
    }

    #[test]
    fn test_config_unknown_key() {
        let mut config = Config::default();
        let result = config.set("unknown-key", "value".to_string());
        assert!(matches!(result, Err(ConfigError::UnknownKey(ref key)) if key == "unknown-key"));
        assert_eq!(config.get("unknown-key"), None);
        assert!(config.unset("unknown-key").is_err());
    }

    #[test]
    fn test_config_values_in_key_order() {
        let mut config = Config::default();
        assert!(config.set("diagnostics", "false".to_string()).is_ok());
        assert!(config.set("export-schema", "schema.toml".to_string()).is_ok());
        let keys: Vec<&str> = config.values_iter().into_iter().map(|(key, _)| key).collect();
        assert_eq!(keys, vec!["export-schema", "diagnostics"]);

        assert!(config.unset("export-schema").is_ok());
        assert_eq!(config.values_iter().len(), 1);
    }

    #[test]
    fn test_config_save_and_load() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let path = dir.path().join("nested").join("cellport.toml");

        let mut config = Config::default();
        assert!(config.set("export-schema", "/etc/cellport/schema.toml".to_string()).is_ok());
        assert!(config.set("diagnostics", "true".to_string()).is_ok());
        assert!(config.save_to_path(&path).is_ok());

        let content = fs::read_to_string(&path).unwrap_or_default();
        assert!(content.contains("export-schema = \"/etc/cellport/schema.toml\""));
        assert!(!content.contains("output-dir"));

        let loaded = Config::load_from_path(&path);
        assert!(loaded.is_ok_and(|c| c == config));
    }

    #[test]
    fn test_config_missing_file_is_default() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let loaded = Config::load_from_path(&dir.path().join("absent.toml"));
        assert!(loaded.is_ok_and(|c| c.is_empty()));
    }

    #[test]
    fn test_config_invalid_file() {
        let Ok(dir) = TempDir::new() else {
            return;
        };
        let path = dir.path().join("cellport.toml");
        assert!(fs::write(&path, "diagnostics = \"maybe\"\n").is_ok());
        assert!(matches!(
            Config::load_from_path(&path),
            Err(ConfigError::Parse(_))
        ));
    }
}
