use serde::Deserialize;
use std::fs;
use std::path::Path;

const ENV_CONFIG_PATH: &str = "SAFEVOICE_CONFIG_PATH";
const DEFAULT_CONFIG_PATH: &str = "config.yaml";

const DEFAULT_TRIAGE_TEMPERATURE: f64 = 0.2;
const DEFAULT_TRIAGE_TIMEOUT_SECS: u64 = 10;

/// Triage pipeline configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TriageConfig {
    /// Alternate OpenAI-compatible endpoint. None means the default OpenAI API.
    #[serde(default)]
    pub base_url: Option<String>,
    /// Sampling temperature for severity judgments. Kept low to reduce
    /// variance between calls on the same description.
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    /// Upper bound on a single completion call. Expiry is treated as a
    /// classifier failure and triggers the keyword fallback.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_temperature() -> f64 {
    DEFAULT_TRIAGE_TEMPERATURE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TRIAGE_TIMEOUT_SECS
}

/// YAML configuration file structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub triage: TriageConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            temperature: DEFAULT_TRIAGE_TEMPERATURE,
            timeout_secs: DEFAULT_TRIAGE_TIMEOUT_SECS,
        }
    }
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub triage: TriageConfig,
    pub port: u16,
    pub host: String,
    /// Origins allowed by the CORS layer. Empty means same-origin only.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            triage: TriageConfig::default(),
            port: 8080,
            host: "127.0.0.1".to_string(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    /// Load configuration from environment and config file
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let host = std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

        let cors_allowed_origins = std::env::var("CORS_ALLOWED_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        // Load config file
        let config_path =
            std::env::var(ENV_CONFIG_PATH).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

        let triage = Self::load_config_file(&config_path)
            .map(|cf| cf.triage)
            .unwrap_or_default();

        Self {
            triage,
            port,
            host,
            cors_allowed_origins,
        }
    }

    /// Load configuration from YAML file
    fn load_config_file(path: &str) -> Option<ConfigFile> {
        let path = Path::new(path);

        if !path.exists() {
            tracing::debug!(path = %path.display(), "Config file not found, using defaults");
            return None;
        }

        match fs::read_to_string(path) {
            Ok(contents) => {
                // Handle empty file
                let contents = contents.trim();
                if contents.is_empty() {
                    tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
                    return Some(ConfigFile::default());
                }

                match serde_yaml::from_str(contents) {
                    Ok(config) => {
                        tracing::info!(path = %path.display(), "Loaded configuration from file");
                        Some(config)
                    }
                    Err(e) => {
                        tracing::warn!(path = %path.display(), error = %e, "Failed to parse config file, using defaults");
                        None
                    }
                }
            }
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "Failed to read config file, using defaults");
                None
            }
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_defaults_are_bounded() {
        let config = TriageConfig::default();
        assert!(config.temperature <= 0.3);
        assert_eq!(config.timeout_secs, 10);
        assert!(config.base_url.is_none());
    }

    #[test]
    fn config_file_parses_partial_triage_section() {
        let yaml = "triage:\n  timeout_secs: 5\n";
        let parsed: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(parsed.triage.timeout_secs, 5);
        assert_eq!(parsed.triage.temperature, DEFAULT_TRIAGE_TEMPERATURE);
    }
}
