use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Catalog file to use instead of the built-in schedule.
    pub catalog_path: Option<PathBuf>,
    pub show_welcome: bool,
    pub log_level: String,
    pub log_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            catalog_path: None,
            show_welcome: true,
            log_level: "info".into(),
            log_file: None,
        }
    }
}

impl Config {
    /// Read the config file if there is one, then apply `STUDIO_CATALOG`.
    pub fn load() -> Result<Self> {
        let mut config = match Self::config_path() {
            Some(path) if path.exists() => {
                let contents = std::fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config at {}", path.display()))?;
                Self::parse(&contents)?
            }
            _ => Config::default(),
        };

        if let Ok(catalog) = std::env::var("STUDIO_CATALOG") {
            if !catalog.trim().is_empty() {
                config.catalog_path = Some(PathBuf::from(catalog));
            }
        }

        Ok(config)
    }

    pub fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).with_context(|| "Failed to parse config.toml")
    }

    pub fn generate_default() -> Result<PathBuf> {
        let path = Self::config_path()
            .with_context(|| "Could not determine config directory")?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let toml_str = toml::to_string_pretty(&Config::default())?;
        std::fs::write(&path, toml_str)?;
        Ok(path)
    }

    /// Where log lines go; the terminal itself belongs to the UI.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_file.clone().or_else(|| {
            dirs::cache_dir().map(|d| d.join("studio-schedule").join("studio-schedule.log"))
        })
    }

    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("studio-schedule").join("config.toml"))
    }
}
