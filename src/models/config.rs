//! Configuration models for biasbench.
//!
//! Every section is optional; command-line flags override file values.

use crate::prompt::PromptStyle;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for biasbench.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Dataset location and selection
    #[serde(default)]
    pub data: DataConfig,

    /// Prompt rendering
    #[serde(default)]
    pub prompt: PromptConfig,

    /// Export settings
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the BBQ files live and which of them to load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataConfig {
    /// Directory holding the category JSONL files.
    /// May contain ${ENV_VAR} placeholders.
    #[serde(default = "default_root")]
    pub root: String,

    /// Category to load (all categories when unset)
    #[serde(default)]
    pub category: Option<String>,

    /// Maximum number of entries shown by `show` and `prompts`
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_root() -> String {
    "data/bbq".to_string()
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            category: None,
            limit: None,
        }
    }
}

impl DataConfig {
    /// Root directory with environment placeholders expanded.
    pub fn root_path(&self) -> PathBuf {
        PathBuf::from(expand_env_vars(&self.root))
    }
}

/// Prompt rendering configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PromptConfig {
    #[serde(default)]
    pub style: PromptStyle,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Export file path
    #[serde(default = "default_output_path")]
    pub path: PathBuf,
}

fn default_output_path() -> PathBuf {
    PathBuf::from("output/bbq.jsonl")
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: default_output_path(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_owned(),
            source: e,
        })?;

        toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.to_owned(),
            source: e,
        })
    }

    /// Load from `path` when given, otherwise use defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }
}

/// Expand environment variables in a string.
///
/// Supports ${VAR_NAME} syntax.
/// If the variable is not set, the placeholder is left unchanged.
pub fn expand_env_vars(s: &str) -> String {
    static PLACEHOLDER: std::sync::LazyLock<regex::Regex> =
        std::sync::LazyLock::new(|| regex::Regex::new(r"\$\{([^}]+)\}").unwrap());

    PLACEHOLDER
        .replace_all(s, |caps: &regex::Captures<'_>| {
            std::env::var(&caps[1]).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.data.root, "data/bbq");
        assert!(config.data.category.is_none());
        assert_eq!(config.prompt.style, PromptStyle::UnknownLast);
        assert_eq!(config.output.path, PathBuf::from("output/bbq.jsonl"));
    }

    #[test]
    fn test_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[data]
root = "/srv/bbq/data"
category = "religion"
limit = 3

[prompt]
style = "indexed"
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.data.root_path(), PathBuf::from("/srv/bbq/data"));
        assert_eq!(config.data.category.as_deref(), Some("religion"));
        assert_eq!(config.data.limit, Some(3));
        assert_eq!(config.prompt.style, PromptStyle::Indexed);
    }

    #[test]
    fn test_from_file_errors() {
        let missing = Config::from_file(Path::new("/nonexistent/biasbench.toml"));
        assert!(matches!(missing, Err(ConfigError::FileRead { .. })));

        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[prompt]\nstyle = \"sideways\"").unwrap();
        let bad = Config::from_file(file.path());
        assert!(matches!(bad, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_expand_env_vars() {
        // SAFETY: the variable name is unique to this test.
        unsafe { std::env::set_var("BIASBENCH_TEST_ROOT", "/mnt/datasets") };
        assert_eq!(
            expand_env_vars("${BIASBENCH_TEST_ROOT}/bbq"),
            "/mnt/datasets/bbq"
        );
        assert_eq!(
            expand_env_vars("${BIASBENCH_UNSET_VARIABLE}/bbq"),
            "${BIASBENCH_UNSET_VARIABLE}/bbq"
        );
    }
}
