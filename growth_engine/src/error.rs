//! Error types for loading growth configuration.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("invalid rule: {0}")]
    InvalidRule(String),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

impl ConfigError {
    pub fn invalid_rule(reason: impl Into<String>) -> Self {
        Self::InvalidRule(reason.into())
    }
}
