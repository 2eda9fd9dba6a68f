//! Configuration file handling.
//!
//! Defaults reproduce the published dataset exactly; a `.census-data.toml`
//! file is only read when passed explicitly with `--config`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// File name written by `--init-config`.
pub const DEFAULT_CONFIG_FILE: &str = ".census-data.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Census API settings.
    #[serde(default)]
    pub census: CensusConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Census API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CensusConfig {
    /// Dataset endpoint, without query string.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Geography filter passed as `for=`.
    #[serde(default = "default_geography")]
    pub geography: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
}

impl Default for CensusConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            geography: default_geography(),
            timeout_seconds: default_timeout(),
        }
    }
}

fn default_endpoint() -> String {
    "https://api.census.gov/data/2024/acs/acs1".to_string()
}

fn default_geography() -> String {
    "us:1".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Where the frontend dataset is written.
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

/// `<repo-root>/public/data.json`
fn default_output_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("public")
        .join("data.json")
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.output.path = output.clone();
        }

        if let Some(timeout) = args.timeout {
            self.census.timeout_seconds = timeout;
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.census.endpoint,
            "https://api.census.gov/data/2024/acs/acs1"
        );
        assert_eq!(config.census.geography, "us:1");
        assert!(config.output.path.ends_with("public/data.json"));
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[census]
endpoint = "http://127.0.0.1:8080/data"
timeout_seconds = 5

[output]
path = "out/data.json"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.census.endpoint, "http://127.0.0.1:8080/data");
        assert_eq!(config.census.timeout_seconds, 5);
        assert_eq!(config.census.geography, "us:1");
        assert_eq!(config.output.path, PathBuf::from("out/data.json"));
    }

    #[test]
    fn test_partial_config_keeps_defaults() {
        let config: Config = toml::from_str("[output]\npath = \"x.json\"\n").unwrap();
        assert_eq!(config.census.timeout_seconds, 30);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(toml_str.contains("[census]"));
        assert!(toml_str.contains("[output]"));

        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.census.geography, "us:1");
    }
}
