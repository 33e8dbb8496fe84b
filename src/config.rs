use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::cli::Cli;
use crate::error::{Error, Result};
use crate::history::{DEFAULT_HISTORY_LIMIT, HistoryStore};
use crate::tessl::{DEFAULT_BINARY, DEFAULT_TIMEOUT};

pub const DEFAULT_CONFIG_FILE: &str = ".skill-health.toml";

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub tessl_binary: Option<String>,
    pub timeout_secs: Option<u64>,
    pub history_dir: Option<String>,
    pub history_limit: Option<usize>,
    pub prompt_dir: Option<String>,
    pub color: Option<bool>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub tessl_binary: String,
    pub timeout: Duration,
    pub history_dir: PathBuf,
    pub history_limit: usize,
    pub prompt_dir: Option<PathBuf>,
    pub color: bool,
}

impl Config {
    /// Load the config file and apply CLI overrides.
    ///
    /// An explicit `--config` path must exist; the default file is optional.
    pub fn load(cli: &Cli) -> Result<Self> {
        let file_config = match cli.config {
            Some(ref path) => {
                let path = Path::new(path);
                if !path.exists() {
                    return Err(Error::ConfigNotFound(path.to_path_buf()));
                }
                parse_config(&std::fs::read_to_string(path)?)?
            }
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    parse_config(&std::fs::read_to_string(path)?)?
                } else {
                    ConfigFile::default()
                }
            }
        };

        Ok(merge(file_config, cli))
    }
}

pub fn parse_config(content: &str) -> Result<ConfigFile> {
    let config: ConfigFile = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &ConfigFile) -> Result<()> {
    if let Some(ref binary) = config.tessl_binary
        && binary.trim().is_empty()
    {
        return Err(Error::ConfigValidation(
            "tessl_binary must not be empty".to_string(),
        ));
    }
    if config.timeout_secs == Some(0) {
        return Err(Error::ConfigValidation(
            "timeout_secs must be > 0".to_string(),
        ));
    }
    if config.history_limit == Some(0) {
        return Err(Error::ConfigValidation(
            "history_limit must be > 0".to_string(),
        ));
    }
    Ok(())
}

pub fn merge(file: ConfigFile, cli: &Cli) -> Config {
    Config {
        tessl_binary: cli
            .tessl_binary
            .clone()
            .or(file.tessl_binary)
            .unwrap_or_else(|| DEFAULT_BINARY.to_string()),
        timeout: cli
            .timeout
            .or(file.timeout_secs)
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT),
        history_dir: cli
            .history_dir
            .clone()
            .or(file.history_dir)
            .map(PathBuf::from)
            .unwrap_or_else(HistoryStore::default_dir),
        history_limit: file.history_limit.unwrap_or(DEFAULT_HISTORY_LIMIT),
        prompt_dir: cli.prompt_dir.clone().or(file.prompt_dir).map(PathBuf::from),
        color: !cli.no_color && file.color.unwrap_or(true),
    }
}
