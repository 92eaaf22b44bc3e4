//! Startup configuration: built-in defaults, then an optional RON file, then
//! command-line flags.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use log::LevelFilter;
use pricegrid_client::{SearchConfig, DEFAULT_ENDPOINT};
use pricegrid_logging::{LogDestination, DEFAULT_LOG_FILE};
use serde::{Deserialize, Serialize};

use crate::cli::Cli;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub endpoint_url: Option<String>,
    pub max_results: Option<u32>,
    pub request_timeout_secs: Option<u64>,
    pub log_to_file: Option<bool>,
}

pub fn load_file_config(path: &Path) -> anyhow::Result<FileConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config: FileConfig = ron::from_str(&content)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    Ok(config)
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub search: SearchConfig,
    pub log_to_file: bool,
    pub log_level: LevelFilter,
}

impl Settings {
    pub fn log_destination(&self) -> LogDestination {
        if self.log_to_file {
            LogDestination::Both(PathBuf::from(DEFAULT_LOG_FILE))
        } else {
            LogDestination::Terminal
        }
    }
}

/// Merges the file config under the command-line flags.
pub fn resolve(cli: &Cli, file: FileConfig) -> anyhow::Result<Settings> {
    let endpoint = cli
        .endpoint
        .clone()
        .or(file.endpoint_url)
        .unwrap_or_else(|| DEFAULT_ENDPOINT.to_string());

    let mut search = SearchConfig::new(&endpoint)?;
    if let Some(max_results) = cli.max_results.or(file.max_results) {
        search = search.with_max_results(max_results)?;
    }
    let timeout = cli
        .timeout_secs
        .or(file.request_timeout_secs)
        .filter(|secs| *secs > 0)
        .map(Duration::from_secs);
    search = search.with_request_timeout(timeout);

    Ok(Settings {
        search,
        log_to_file: cli.log_file || file.log_to_file.unwrap_or(false),
        log_level: cli.log_level(),
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;
    use pricegrid_client::DEFAULT_MAX_RESULTS;
    use tempfile::NamedTempFile;

    use super::*;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults_without_file_or_flags() {
        let cli = Cli::parse_from(["pricegrid"]);
        let settings = resolve(&cli, FileConfig::default()).unwrap();

        assert_eq!(settings.search.endpoint.as_str(), DEFAULT_ENDPOINT);
        assert_eq!(settings.search.default_max_results, Some(DEFAULT_MAX_RESULTS));
        assert_eq!(settings.search.request_timeout, None);
        assert_eq!(settings.log_destination(), LogDestination::Terminal);
    }

    #[test]
    fn file_values_are_loaded() {
        let file = write_config(
            r#"(
                endpoint_url: Some("https://grid.example.com/api/search"),
                max_results: Some(8),
                request_timeout_secs: Some(45),
            )"#,
        );
        let loaded = load_file_config(file.path()).unwrap();
        assert_eq!(loaded.log_to_file, None);

        let cli = Cli::parse_from(["pricegrid"]);
        let settings = resolve(&cli, loaded).unwrap();
        assert_eq!(
            settings.search.endpoint.as_str(),
            "https://grid.example.com/api/search"
        );
        assert_eq!(settings.search.default_max_results, Some(8));
        assert_eq!(settings.search.request_timeout, Some(Duration::from_secs(45)));
    }

    #[test]
    fn flags_override_file() {
        let file = FileConfig {
            endpoint_url: Some("https://grid.example.com/api/search".to_string()),
            max_results: Some(8),
            request_timeout_secs: Some(45),
            log_to_file: Some(false),
        };
        let cli = Cli::parse_from([
            "pricegrid",
            "--endpoint",
            "http://127.0.0.1:5000/api/search",
            "--max-results",
            "3",
            "--timeout-secs",
            "0",
            "--log-file",
        ]);

        let settings = resolve(&cli, file).unwrap();
        assert_eq!(
            settings.search.endpoint.as_str(),
            "http://127.0.0.1:5000/api/search"
        );
        assert_eq!(settings.search.default_max_results, Some(3));
        assert_eq!(settings.search.request_timeout, None);
        assert!(matches!(settings.log_destination(), LogDestination::Both(_)));
    }

    #[test]
    fn invalid_endpoint_is_an_error() {
        let cli = Cli::parse_from(["pricegrid", "--endpoint", "localhost search"]);
        assert!(resolve(&cli, FileConfig::default()).is_err());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let file = write_config("(endpoint_url: 42)");
        assert!(load_file_config(file.path()).is_err());
    }
}
