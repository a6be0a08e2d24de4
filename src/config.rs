//! Tunables for message rendering.
//!
//! Defaults reproduce the classic layout: a `diff:` section when it adds
//! information, and a `folded diff:` section wrapped at 78 columns whenever a
//! changed line reaches 80 columns. A YAML file may override any subset:
//!
//! ```yaml
//! diff:
//!   fold_width: 60
//!   fold_threshold: 62
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("failed to read config file {}", path.display())]
    #[diagnostic(code(sutra::config::io))]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config")]
    #[diagnostic(code(sutra::config::parse), help("expected a YAML mapping with a `diff` section"))]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for `{field}`: {reason}")]
    #[diagnostic(code(sutra::config::invalid))]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssertConfig {
    pub diff: DiffConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiffConfig {
    /// Segment width, in characters, of the folded rendering.
    pub fold_width: usize,
    /// Width, prefix included, at which a changed line triggers folding.
    pub fold_threshold: usize,
    /// Minimum similarity for two lines of a replaced block to be paired
    /// and marked character by character.
    pub match_cutoff: f64,
    /// A diff with no unchanged or marker lines is shown only if it is at
    /// least this long.
    pub min_lines: usize,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            fold_width: 78,
            fold_threshold: 80,
            match_cutoff: 0.75,
            min_lines: 3,
        }
    }
}

impl AssertConfig {
    pub fn from_yaml_str(source: &str) -> Result<Self, ConfigError> {
        let config: AssertConfig = serde_yaml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&source)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let diff = &self.diff;
        if diff.fold_width == 0 {
            return Err(ConfigError::Invalid {
                field: "diff.fold_width",
                reason: "must be at least 1".to_string(),
            });
        }
        if !(0.0..=1.0).contains(&diff.match_cutoff) {
            return Err(ConfigError::Invalid {
                field: "diff.match_cutoff",
                reason: format!("{} is outside 0.0..=1.0", diff.match_cutoff),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = AssertConfig::from_yaml_str("diff:\n  fold_width: 60\n").unwrap();
        assert_eq!(config.diff.fold_width, 60);
        assert_eq!(config.diff.fold_threshold, 80);
        assert_eq!(config.diff.match_cutoff, 0.75);
    }

    #[test]
    fn test_empty_document_is_default() {
        let config = AssertConfig::from_yaml_str("{}").unwrap();
        assert_eq!(config, AssertConfig::default());
    }

    #[test]
    fn test_rejects_unknown_and_invalid_fields() {
        assert!(matches!(
            AssertConfig::from_yaml_str("diff:\n  width: 3\n"),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            AssertConfig::from_yaml_str("diff:\n  fold_width: 0\n"),
            Err(ConfigError::Invalid { field: "diff.fold_width", .. })
        ));
    }

    #[test]
    fn test_missing_file_reports_path() {
        let err = AssertConfig::load("/nonexistent/sutra-assert.yaml").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/sutra-assert.yaml"));
    }
}
