use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::AutoPrError;

/// Configuration file structure for autopr.
///
/// Every setting can also come from the command line; command-line values win.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    /// Job API settings
    #[serde(default)]
    pub api: ApiConfig,

    /// Output preferences
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ApiConfig {
    /// Submission endpoint URL; the status endpoint is derived from it
    pub endpoint: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Pretty-print JSON reports
    #[serde(default)]
    pub pretty: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_timeout_secs() -> u64 {
    30
}

fn non_blank(value: &&str) -> bool {
    !value.is_empty()
}

impl ApiConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Picks the endpoint from the command line, falling back to the config file.
    ///
    /// There is no built-in default: an unset endpoint is a configuration error.
    pub fn resolve_endpoint(&self, cli_endpoint: Option<&str>) -> crate::error::Result<String> {
        cli_endpoint
            .map(str::trim)
            .filter(non_blank)
            .or_else(|| self.endpoint.as_deref().map(str::trim).filter(non_blank))
            .map(ToString::to_string)
            .ok_or_else(|| {
                AutoPrError::Config(
                    "No API endpoint configured; pass --endpoint or set AUTOPR_API_ENDPOINT"
                        .to_string(),
                )
            })
    }
}

impl Config {
    /// Load configuration from a file.
    ///
    /// Searches for configuration files in this order:
    /// 1. Specified path
    /// 2. ./autopr.toml
    /// 3. ./autopr.json
    /// 4. ./autopr.yaml
    /// 5. ./autopr.yml
    /// 6. `<user config dir>/autopr/config.toml`
    ///
    /// Returns default configuration if no file is found.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::load_from_path(path);
        }

        let candidates = ["autopr.toml", "autopr.json", "autopr.yaml", "autopr.yml"];

        for candidate in &candidates {
            let path = Path::new(candidate);
            if path.exists() {
                return Self::load_from_path(path);
            }
        }

        if let Some(path) = user_config_path().filter(|path| path.exists()) {
            return Self::load_from_path(&path);
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file path.
    fn load_from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let extension = path.extension().and_then(|ext| ext.to_str()).unwrap_or("");

        match extension {
            "toml" => toml::from_str(&contents)
                .with_context(|| format!("Failed to parse TOML config: {}", path.display())),
            "json" => serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse JSON config: {}", path.display())),
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .with_context(|| format!("Failed to parse YAML config: {}", path.display())),
            _ => toml::from_str(&contents)
                .or_else(|_| serde_json::from_str(&contents))
                .or_else(|_| serde_yaml::from_str(&contents))
                .with_context(|| format!("Failed to parse config file: {}", path.display())),
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("autopr").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.api.endpoint.is_none());
        assert_eq!(config.api.timeout_secs, 30);
        assert!(!config.output.pretty);
    }

    #[test]
    fn test_load_toml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        let toml_content = r#"
[api]
endpoint = "https://api.example.com/prod/process"
timeout-secs = 10

[output]
pretty = true
"#;
        write!(temp_file, "{}", toml_content).unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(
            config.api.endpoint.as_deref(),
            Some("https://api.example.com/prod/process")
        );
        assert_eq!(config.api.timeout(), Duration::from_secs(10));
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_json_config() {
        let mut temp_file = NamedTempFile::with_suffix(".json").unwrap();
        write!(
            temp_file,
            r#"{{"api": {{"endpoint": "https://json.example.com/process"}}}}"#
        )
        .unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(
            config.api.endpoint.as_deref(),
            Some("https://json.example.com/process")
        );
        assert_eq!(config.api.timeout_secs, 30);
    }

    #[test]
    fn test_load_yaml_config() {
        let mut temp_file = NamedTempFile::with_suffix(".yaml").unwrap();
        write!(temp_file, "api:\n  timeout-secs: 5\noutput:\n  pretty: true\n").unwrap();

        let config = Config::load_from_path(temp_file.path()).unwrap();
        assert_eq!(config.api.timeout_secs, 5);
        assert!(config.output.pretty);
    }

    #[test]
    fn test_load_missing_explicit_path_fails() {
        assert!(Config::load(Some(Path::new("does-not-exist.toml"))).is_err());
    }

    #[test]
    fn test_invalid_config_reports_path() {
        let mut temp_file = NamedTempFile::with_suffix(".toml").unwrap();
        write!(temp_file, "[api\nendpoint = ").unwrap();

        let err = Config::load_from_path(temp_file.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse TOML config"));
    }

    #[test]
    fn test_cli_endpoint_wins() {
        let config = ApiConfig {
            endpoint: Some("https://file.example.com/process".to_string()),
            ..ApiConfig::default()
        };
        assert_eq!(
            config
                .resolve_endpoint(Some("https://cli.example.com/process"))
                .unwrap(),
            "https://cli.example.com/process"
        );
        assert_eq!(
            config.resolve_endpoint(None).unwrap(),
            "https://file.example.com/process"
        );
    }

    #[test]
    fn test_missing_endpoint_fails_closed() {
        let result = ApiConfig::default().resolve_endpoint(None);
        assert!(matches!(result, Err(AutoPrError::Config(_))));

        let result = ApiConfig::default().resolve_endpoint(Some("   "));
        assert!(result.is_err());
    }
}
