//! Service configuration.
//!
//! Settings come from three layers, highest precedence first:
//!
//! 1. Command-line flags and their environment variables ([`Cli`])
//! 2. An optional YAML file passed with `--config`
//! 3. Built-in defaults
//!
//! ```yaml
//! api_key: "..."
//! model: mistral-tiny
//! api_base_url: https://api.mistral.ai
//! news_base_url: https://news.itmo.ru
//! news_page_path: /ru/
//! news_timeout_secs: 5
//! ```

use crate::api::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use crate::cli::Cli;
use crate::scrapers::news::{DEFAULT_BASE_URL, DEFAULT_PAGE_PATH, DEFAULT_TIMEOUT_SECS};
use serde::Deserialize;
use std::error::Error;
use std::fmt;
use std::time::Duration;
use tracing::{info, instrument};

/// Contents of the YAML config file. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub api_key: Option<String>,
    pub model: Option<String>,
    pub api_base_url: Option<String>,
    pub news_base_url: Option<String>,
    pub news_page_path: Option<String>,
    pub news_timeout_secs: Option<u64>,
}

impl FileConfig {
    /// Read and parse a YAML config file.
    #[instrument(level = "info", skip_all, fields(%path))]
    pub fn load(path: &str) -> Result<Self, Box<dyn Error>> {
        let raw = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&raw)?;
        info!("Loaded configuration file");
        Ok(config)
    }

    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        // An empty file deserializes to unit, not a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(raw)
    }
}

/// Fully resolved settings, fixed for the lifetime of the process.
#[derive(Clone)]
pub struct ServiceConfig {
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
    pub news_base_url: String,
    pub news_page_path: String,
    pub news_timeout: Duration,
}

impl fmt::Debug for ServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .field("news_base_url", &self.news_base_url)
            .field("news_page_path", &self.news_page_path)
            .field("news_timeout", &self.news_timeout)
            .finish()
    }
}

impl ServiceConfig {
    /// Merge CLI/env values over `file` over the defaults.
    ///
    /// # Errors
    ///
    /// Fails when no layer provides an API key.
    pub fn resolve(cli: &Cli, file: FileConfig) -> Result<Self, Box<dyn Error>> {
        let api_key = cli
            .api_key
            .clone()
            .or(file.api_key)
            .filter(|k| !k.trim().is_empty())
            .ok_or("no API key configured (set MISTRAL_API_KEY, --api-key, or api_key in the config file)")?;

        Ok(Self {
            api_key,
            model: cli
                .model
                .clone()
                .or(file.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: cli
                .api_base_url
                .clone()
                .or(file.api_base_url)
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            news_base_url: cli
                .news_base_url
                .clone()
                .or(file.news_base_url)
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            news_page_path: cli
                .news_page_path
                .clone()
                .or(file.news_page_path)
                .unwrap_or_else(|| DEFAULT_PAGE_PATH.to_string()),
            news_timeout: Duration::from_secs(
                cli.news_timeout_secs
                    .or(file.news_timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            ),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["quiz_answer_service"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv)
    }

    #[test]
    fn test_defaults_with_cli_key() {
        let config = ServiceConfig::resolve(&cli(&["--api-key", "k"]), FileConfig::default()).unwrap();
        assert_eq!(config.api_key, "k");
        assert_eq!(config.model, "mistral-tiny");
        assert_eq!(config.api_base_url, "https://api.mistral.ai");
        assert_eq!(config.news_base_url, "https://news.itmo.ru");
        assert_eq!(config.news_page_path, "/ru/");
        assert_eq!(config.news_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_file_overrides_defaults() {
        let file = FileConfig::from_yaml(
            "api_key: from-file\nmodel: mistral-small\nnews_page_path: /en/\nnews_timeout_secs: 9\n",
        )
        .unwrap();
        let config = ServiceConfig::resolve(&cli(&[]), file).unwrap();
        assert_eq!(config.api_key, "from-file");
        assert_eq!(config.model, "mistral-small");
        assert_eq!(config.news_page_path, "/en/");
        assert_eq!(config.news_timeout, Duration::from_secs(9));
    }

    #[test]
    fn test_cli_overrides_file() {
        let file = FileConfig::from_yaml("api_key: from-file\nmodel: mistral-small\n").unwrap();
        let config =
            ServiceConfig::resolve(&cli(&["--api-key", "from-cli", "--model", "m2"]), file).unwrap();
        assert_eq!(config.api_key, "from-cli");
        assert_eq!(config.model, "m2");
    }

    #[test]
    fn test_cli_overrides_file_news_settings() {
        let file = FileConfig::from_yaml(
            "api_key: k\nnews_base_url: https://file.example\nnews_page_path: /en/\nnews_timeout_secs: 9\n",
        )
        .unwrap();
        let config = ServiceConfig::resolve(
            &cli(&[
                "--news-base-url",
                "https://cli.example",
                "--news-page-path",
                "/ru/latest/",
                "--news-timeout-secs",
                "2",
            ]),
            file,
        )
        .unwrap();
        assert_eq!(config.news_base_url, "https://cli.example");
        assert_eq!(config.news_page_path, "/ru/latest/");
        assert_eq!(config.news_timeout, Duration::from_secs(2));
    }

    #[test]
    fn test_empty_yaml_is_default() {
        let file = FileConfig::from_yaml("").unwrap();
        assert!(file.api_key.is_none());
    }

    #[test]
    fn test_unknown_yaml_key_rejected() {
        assert!(FileConfig::from_yaml("apikey: typo\n").is_err());
    }

    #[test]
    fn test_missing_key_is_error() {
        let file = FileConfig::from_yaml("api_key: \"  \"\n").unwrap();
        assert!(ServiceConfig::resolve(&cli(&[]), file).is_err());
    }

    #[test]
    fn test_debug_redacts_key() {
        let config = ServiceConfig::resolve(&cli(&["--api-key", "s3cret"]), FileConfig::default()).unwrap();
        assert!(!format!("{config:?}").contains("s3cret"));
    }
}
