//! Configuration errors. Always fatal, raised before any sample is processed.

use super::error_code::{self, CodemarkErrorCode};

/// Errors in the run configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Backdoor spec for corpus part {part} is empty")]
    EmptyBackdoor { part: usize },

    #[error("No backdoor specs configured")]
    NoBackdoors,

    #[error("Unknown SPT '{id}' for language {language}")]
    UnknownSpt { language: String, id: String },

    #[error("Unknown variant '{variant}' for SPT '{id}'")]
    UnknownVariant { id: String, variant: String },

    #[error("SPT '{id}' appears more than once in backdoor spec for part {part}")]
    DuplicateSpt { part: usize, id: String },

    #[error("Invalid mark rate {rate}: {reason}")]
    InvalidMarkRate { rate: f64, reason: String },

    #[error("Unsupported language: {name}")]
    UnsupportedLanguage { name: String },

    #[error("Missing required setting: {field}")]
    MissingField { field: String },

    #[error("Failed to read config {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CodemarkErrorCode for ConfigError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyBackdoor { .. } | Self::NoBackdoors => error_code::CONFIG_EMPTY_BACKDOOR,
            Self::UnknownSpt { .. } | Self::UnknownVariant { .. } => error_code::CONFIG_UNKNOWN_SPT,
            Self::InvalidMarkRate { .. } => error_code::CONFIG_INVALID_MARK_RATE,
            _ => error_code::CONFIG_ERROR,
        }
    }
}
