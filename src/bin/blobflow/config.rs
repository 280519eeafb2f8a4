// Configuration loading for blobflow

use anyhow::{Context, Result};
use blobflow::{BackendConfig, LogConfig, WorkflowConfig};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// blobflow configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct AppConfig {
    /// Workflow names, content and account defaults
    pub workflow: WorkflowConfig,

    /// Storage backend (AzureBlobService or MemoryBlobService)
    pub backend: BackendConfig,

    /// Logging options
    pub log: LogConfig,
}

impl AppConfig {
    /// Load configuration from file
    ///
    /// An explicit path must exist. Without one, the default path is read if
    /// present, otherwise the built-in defaults are used.
    pub fn load(config_path: Option<&str>) -> Result<Self> {
        let path = match config_path {
            Some(p) => {
                let path = PathBuf::from(shellexpand::tilde(p).to_string());
                if !path.exists() {
                    return Err(anyhow::anyhow!("Config file not found: {}", path.display()));
                }
                path
            }
            None => match Self::default_config_path() {
                Some(path) if path.exists() => path,
                _ => return Ok(Self::default()),
            },
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Parse YAML content, expanding ${VAR} references first
    pub fn parse(content: &str) -> Result<Self> {
        let expanded_content = Self::expand_env_vars(content)?;
        let config: Self = serde_yaml::from_str(&expanded_content)?;
        Ok(config)
    }

    /// Get default config path (~/.blobflow/config.yaml)
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".blobflow").join("config.yaml"))
    }

    /// Expand environment variables in the format ${VAR_NAME}
    fn expand_env_vars(content: &str) -> Result<String> {
        let re = regex_lite::Regex::new(r"\$\{([^}]+)\}")?;
        let expanded = re.replace_all(content, |caps: &regex_lite::Captures| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        });
        Ok(expanded.into_owned())
    }
}
