use crate::error::{Result, RosterError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_DATA_FILE: &str = "students.json";
const DEFAULT_PREVIEW_ROWS: usize = 10;

/// Keys accepted by [`RosterConfig::get`] and [`RosterConfig::set`].
pub const CONFIG_KEYS: &[&str] = &["data-file", "preview-rows"];

/// Configuration for roster, stored in `config.json` in the roster home.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RosterConfig {
    /// Snapshot file; relative paths are resolved against the roster home
    #[serde(default = "default_data_file")]
    pub data_file: String,

    /// Rows shown after an import
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

fn default_data_file() -> String {
    DEFAULT_DATA_FILE.to_string()
}

fn default_preview_rows() -> usize {
    DEFAULT_PREVIEW_ROWS
}

impl Default for RosterConfig {
    fn default() -> Self {
        Self {
            data_file: default_data_file(),
            preview_rows: default_preview_rows(),
        }
    }
}

impl RosterConfig {
    /// Load config from the given directory, or return defaults if not found
    pub fn load<P: AsRef<Path>>(config_dir: P) -> Result<Self> {
        let config_path = config_dir.as_ref().join(CONFIG_FILENAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Save config to the given directory
    pub fn save<P: AsRef<Path>>(&self, config_dir: P) -> Result<()> {
        let config_dir = config_dir.as_ref();
        if !config_dir.exists() {
            fs::create_dir_all(config_dir)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        fs::write(config_dir.join(CONFIG_FILENAME), content)?;
        Ok(())
    }

    /// The snapshot path, resolved against `home` unless already absolute.
    pub fn data_path(&self, home: &Path) -> PathBuf {
        let path = Path::new(&self.data_file);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            home.join(path)
        }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match key {
            "data-file" => Some(self.data_file.clone()),
            "preview-rows" => Some(self.preview_rows.to_string()),
            _ => None,
        }
    }

    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "data-file" => {
                let value = value.trim();
                if value.is_empty() {
                    return Err(RosterError::Config("data-file cannot be empty".to_string()));
                }
                self.data_file = value.to_string();
            }
            "preview-rows" => {
                self.preview_rows = value.trim().parse().map_err(|_| {
                    RosterError::Config(format!("preview-rows must be a number, got '{}'", value))
                })?;
            }
            other => return Err(unknown_key(other)),
        }
        Ok(())
    }
}

pub fn unknown_key(key: &str) -> RosterError {
    RosterError::Config(format!(
        "Unknown config key: {} (expected one of: {})",
        key,
        CONFIG_KEYS.join(", ")
    ))
}
