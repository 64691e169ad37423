//! Supported corpus languages.

use codemark_core::errors::ConfigError;
use serde::{Deserialize, Serialize};

/// A language with both a grammar and an SPT catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Java,
}

impl Language {
    /// All supported languages.
    pub fn all() -> &'static [Language] {
        &[Self::Python, Self::Java]
    }

    /// Language name as used in configs and output paths.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
        }
    }

    /// Parse from a config/CLI name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "python" | "py" => Some(Self::Python),
            "java" => Some(Self::Java),
            _ => None,
        }
    }

    /// Like [`Language::from_name`] but reports unsupported names as a config error.
    pub fn parse_name(name: &str) -> Result<Self, ConfigError> {
        Self::from_name(name).ok_or_else(|| ConfigError::UnsupportedLanguage {
            name: name.to_string(),
        })
    }

    /// The tree-sitter grammar for this language.
    pub fn ts_language(&self) -> tree_sitter::Language {
        match self {
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            Self::Java => tree_sitter_java::LANGUAGE.into(),
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for lang in Language::all() {
            assert_eq!(Language::from_name(lang.name()), Some(*lang));
        }
        assert_eq!(Language::from_name("PYTHON"), Some(Language::Python));
        assert!(Language::parse_name("cobol").is_err());
    }
}
