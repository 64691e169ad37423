//! Marking run configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_MAX_TREE_DEPTH, DEFAULT_OUTPUT_DIR, DEFAULT_SEARCH_BUDGET};
use crate::errors::ConfigError;

/// Top-level configuration for one marking run.
///
/// Every field is optional so a TOML file can set only what it needs and the
/// CLI can fill in the rest; use the `effective_*` accessors for defaults.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct MarkConfig {
    /// Source language of the corpus ("python" or "java").
    pub language: Option<String>,
    /// Dataset name, used to name output artifacts.
    pub dataset_name: Option<String>,
    /// Corpus file or directory.
    pub data_path: Option<PathBuf>,
    /// Output root. Default: "dataset".
    pub output_dir: Option<PathBuf>,
    /// One backdoor spec per corpus part. Entries are `"spt_id"` or
    /// `"spt_id:variant"`. Default: the language's built-in pair of specs.
    pub backdoors: Option<Vec<Vec<String>>>,
    /// Non-zero mark rates; the rate-0 baseline is always produced. Default: [1.0].
    pub mark_rates: Option<Vec<f64>>,
    /// Worker threads. 0 = rayon default.
    pub threads: Option<usize>,
    pub parse: ParseConfig,
    pub rewrite: RewriteConfig,
    pub selection: SelectionConfig,
}

/// Grammar adapter settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ParseConfig {
    /// Maximum syntax tree depth. Default: 500.
    pub max_depth: Option<usize>,
    /// Treat trees containing ERROR/MISSING nodes as parse failures. Default: true.
    pub reject_error_trees: Option<bool>,
}

/// Transformation applier settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RewriteConfig {
    /// Re-parse rewritten samples and reject those with syntax errors. Default: true.
    pub verify: Option<bool>,
    /// Step budget for choosing disjoint occurrences. Default: 4096.
    pub search_budget: Option<usize>,
}

/// Order in which eligible samples are considered for poisoning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SelectionOrderKind {
    /// Ascending corpus index.
    #[default]
    Index,
    /// Seeded xxh3 hash of the corpus index.
    Hashed,
}

/// Backdoor selector settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SelectionConfig {
    pub order: Option<SelectionOrderKind>,
    /// Seed for `hashed` order. Default: 0.
    pub seed: Option<u64>,
}

impl MarkConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Load a configuration file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        ::tracing::debug!(path = %path.display(), "loading config");
        Self::from_toml_str(&text)
    }

    /// Language name, required.
    pub fn effective_language(&self) -> Result<&str, ConfigError> {
        self.language.as_deref().ok_or_else(|| ConfigError::MissingField {
            field: "language".to_string(),
        })
    }

    /// Dataset name, required.
    pub fn effective_dataset_name(&self) -> Result<&str, ConfigError> {
        self.dataset_name
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "dataset_name".to_string(),
            })
    }

    /// Corpus path, required.
    pub fn effective_data_path(&self) -> Result<&Path, ConfigError> {
        self.data_path
            .as_deref()
            .ok_or_else(|| ConfigError::MissingField {
                field: "data_path".to_string(),
            })
    }

    /// Returns the output root, defaulting to "dataset".
    pub fn effective_output_dir(&self) -> PathBuf {
        self.output_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR))
    }

    /// Returns the configured mark rates, defaulting to `[1.0]`.
    pub fn effective_mark_rates(&self) -> Vec<f64> {
        self.mark_rates.clone().unwrap_or_else(|| vec![1.0])
    }

    /// Returns the thread count, defaulting to 0 (rayon default).
    pub fn effective_threads(&self) -> usize {
        self.threads.unwrap_or(0)
    }
}

impl ParseConfig {
    pub fn effective_max_depth(&self) -> usize {
        self.max_depth.unwrap_or(DEFAULT_MAX_TREE_DEPTH)
    }

    pub fn effective_reject_error_trees(&self) -> bool {
        self.reject_error_trees.unwrap_or(true)
    }
}

impl RewriteConfig {
    pub fn effective_verify(&self) -> bool {
        self.verify.unwrap_or(true)
    }

    pub fn effective_search_budget(&self) -> usize {
        self.search_budget.unwrap_or(DEFAULT_SEARCH_BUDGET)
    }
}

impl SelectionConfig {
    pub fn effective_order(&self) -> SelectionOrderKind {
        self.order.unwrap_or_default()
    }

    pub fn effective_seed(&self) -> u64 {
        self.seed.unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_fields_absent() {
        let config = MarkConfig::from_toml_str("language = \"python\"").unwrap();
        assert_eq!(config.effective_language().unwrap(), "python");
        assert_eq!(config.effective_mark_rates(), vec![1.0]);
        assert_eq!(config.effective_output_dir(), PathBuf::from("dataset"));
        assert_eq!(config.parse.effective_max_depth(), DEFAULT_MAX_TREE_DEPTH);
        assert!(config.parse.effective_reject_error_trees());
        assert!(config.rewrite.effective_verify());
        assert_eq!(config.selection.effective_order(), SelectionOrderKind::Index);
        assert!(config.backdoors.is_none());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let config = MarkConfig::default();
        let err = config.effective_dataset_name().unwrap_err();
        assert!(matches!(err, ConfigError::MissingField { ref field } if field == "dataset_name"));
    }
}
