//! Simplifier configuration.
//!
//! Options are resolved once, before any text is processed. Unknown keys and
//! wrongly typed values are rejected here so a typo never silently falls back
//! to a default.
use crate::vocabulary::VocabularyExtension;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default bound on the number of input lines processed per document.
pub const DEFAULT_MAX_LINES: usize = 10_000;

/// Default text used for a missing branch under [`MissingBranch::Placeholder`].
pub const DEFAULT_BRANCH_PLACEHOLDER: &str = "Continue";

fn default_true() -> bool {
    true
}

fn default_max_lines() -> usize {
    DEFAULT_MAX_LINES
}

fn default_branch_placeholder() -> String {
    DEFAULT_BRANCH_PLACEHOLDER.to_string()
}

/// Configuration failures, reported eagerly at construction.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("configuration must be a JSON object (got {0})")]
    NotAnObject(&'static str),
    #[error("invalid value for `{key}`: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

/// What to emit when a decision's yes or no outcome is not stated in the text.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MissingBranch {
    /// Leave the branch text empty.
    #[default]
    Empty,
    /// Fill the branch with `branch_placeholder`.
    Placeholder,
}

/// Options controlling extraction, decision detection and normalization.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct SimplifierConfig {
    /// Keep nested items under their parent instead of flattening them.
    #[serde(default = "default_true", alias = "preserveSubsteps")]
    pub preserve_substeps: bool,
    /// Insert Start/End terminators when the workflow lacks them.
    #[serde(default = "default_true", alias = "autoTerminators")]
    pub auto_terminators: bool,
    /// Join soft-wrapped lines into one step before decision detection.
    #[serde(default = "default_true", alias = "mergeMultiline")]
    pub merge_multiline: bool,
    #[serde(default, alias = "missingBranch")]
    pub missing_branch: MissingBranch,
    #[serde(default = "default_branch_placeholder", alias = "branchPlaceholder")]
    pub branch_placeholder: String,
    /// Lines past this bound are dropped before detection.
    #[serde(default = "default_max_lines", alias = "maxLines")]
    pub max_lines: usize,
    #[serde(default, skip_serializing_if = "VocabularyExtension::is_empty")]
    pub vocabulary: VocabularyExtension,
}

impl Default for SimplifierConfig {
    fn default() -> Self {
        SimplifierConfig {
            preserve_substeps: true,
            auto_terminators: true,
            merge_multiline: true,
            missing_branch: MissingBranch::Empty,
            branch_placeholder: default_branch_placeholder(),
            max_lines: DEFAULT_MAX_LINES,
            vocabulary: VocabularyExtension::default(),
        }
    }
}

impl SimplifierConfig {
    /// Build a config from an already-parsed JSON value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ConfigError> {
        let kind = json_kind(&value);
        if !value.is_object() {
            return Err(ConfigError::NotAnObject(kind));
        }
        let config: SimplifierConfig = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a JSON document such as `{"preserveSubsteps": false}`.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        Self::from_json_value(value)
    }

    /// Load a JSON config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Check values that deserialize fine but make no sense.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_lines == 0 {
            return Err(ConfigError::InvalidValue {
                key: "max_lines",
                reason: "must be greater than zero".to_string(),
            });
        }
        if self.missing_branch == MissingBranch::Placeholder
            && self.branch_placeholder.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                key: "branch_placeholder",
                reason: "must be non-empty when missing_branch is \"placeholder\"".to_string(),
            });
        }
        for (key, entry) in self.vocabulary.entries() {
            if entry.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    key,
                    reason: "entries must be non-empty".to_string(),
                });
            }
        }
        Ok(())
    }

    /// Text used for a branch the source did not state.
    pub fn missing_branch_text(&self) -> &str {
        match self.missing_branch {
            MissingBranch::Empty => "",
            MissingBranch::Placeholder => self.branch_placeholder.trim(),
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
