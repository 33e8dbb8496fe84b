use std::path::PathBuf;
use std::time::Duration;

use crate::validate::ValidationError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config file not found: {0}")]
    ConfigNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    ConfigValidation(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("review timed out after {} seconds", .0.as_secs())]
    Timeout(Duration),

    #[error("repository or skill not found")]
    RepoNotFound,

    #[error("this repository contains multiple skills; specify which skill to review")]
    SkillNotSpecified { available: Vec<String> },

    #[error("review execution failed: {0}")]
    Execution(String),

    #[error("process error: {0}")]
    Process(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("history error: {0}")]
    History(String),
}

pub type Result<T> = std::result::Result<T, Error>;
