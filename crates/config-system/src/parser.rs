//! Configuration file parser for multiple formats

use crate::{ConfigError, ForecastConfig, Result};
use regex::Regex;
use std::fs;
use std::path::Path;

/// Configuration format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

/// Configuration parser
pub struct ConfigParser;

impl ConfigParser {
    /// Parse configuration from a file, expanding `${VAR}` references first
    pub fn parse_file(path: impl AsRef<Path>) -> Result<ForecastConfig> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)?;
        let format = Self::detect_format(path)?;
        let content = TemplateExpander::expand_env_vars(&content)?;

        log::debug!("Loading {:?} configuration from {}", format, path.display());
        Self::parse_string(&content, format)
    }

    /// Parse configuration from a string
    pub fn parse_string(content: &str, format: ConfigFormat) -> Result<ForecastConfig> {
        match format {
            ConfigFormat::Yaml => serde_yaml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("YAML parse error: {}", e))),
            ConfigFormat::Json => serde_json::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("JSON parse error: {}", e))),
            ConfigFormat::Toml => toml::from_str(content)
                .map_err(|e| ConfigError::Parse(format!("TOML parse error: {}", e))),
        }
    }

    /// Detect configuration format from file extension
    pub fn detect_format(path: &Path) -> Result<ConfigFormat> {
        let ext = path.extension().and_then(|e| e.to_str()).ok_or_else(|| {
            ConfigError::Parse("Cannot determine config format from file extension".to_string())
        })?;

        match ext.to_lowercase().as_str() {
            "yaml" | "yml" => Ok(ConfigFormat::Yaml),
            "json" => Ok(ConfigFormat::Json),
            "toml" => Ok(ConfigFormat::Toml),
            _ => Err(ConfigError::Parse(format!(
                "Unsupported config format: {}",
                ext
            ))),
        }
    }
}

/// Configuration serializer
pub struct ConfigSerializer;

impl ConfigSerializer {
    /// Serialize configuration to a file, format from extension
    pub fn serialize_file(config: &ForecastConfig, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let format = ConfigParser::detect_format(path)?;
        let content = Self::serialize_string(config, format)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn serialize_string(config: &ForecastConfig, format: ConfigFormat) -> Result<String> {
        match format {
            ConfigFormat::Yaml => serde_yaml::to_string(config)
                .map_err(|e| ConfigError::Parse(format!("YAML serialize error: {}", e))),
            ConfigFormat::Json => serde_json::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("JSON serialize error: {}", e))),
            ConfigFormat::Toml => toml::to_string_pretty(config)
                .map_err(|e| ConfigError::Parse(format!("TOML serialize error: {}", e))),
        }
    }
}

/// Template expander for configuration files
pub struct TemplateExpander;

impl TemplateExpander {
    /// Expand `${VAR}` references from the environment.
    ///
    /// Unset variables are left as written so the parser reports them.
    pub fn expand_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}")
            .map_err(|e| ConfigError::Parse(format!("Invalid template pattern: {}", e)))?;

        let expanded = re.replace_all(content, |caps: &regex::Captures<'_>| {
            match std::env::var(&caps[1]) {
                Ok(value) => value,
                Err(_) => {
                    log::warn!("Environment variable {} is not set", &caps[1]);
                    caps[0].to_string()
                }
            }
        });

        Ok(expanded.into_owned())
    }
}
