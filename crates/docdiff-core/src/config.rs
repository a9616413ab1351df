//! TOML configuration for the explorer.
//!
//! Every section carries `#[serde(default)]`, so a partial file (or none at
//! all) yields the built-in conventions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::side::{Side, SideConventions};

pub const DEFAULT_CONFIG_FILE: &str = "docdiff.toml";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sides: SideConventions,
    pub climate: ClimateConfig,
    pub search: SearchConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Additional attempts after a timeout, connection failure, or 5xx.
    pub retries: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: "https://docdiff.mooo.com".to_string(),
            timeout_secs: 10,
            retries: 1,
        }
    }
}

/// The two climate reports compared in the paragraph view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClimateConfig {
    pub document_a: String,
    pub document_b: String,
    pub label_a: String,
    pub label_b: String,
    /// `size` sent with each paragraph pair lookup.
    pub page_size: u32,
}

impl Default for ClimateConfig {
    fn default() -> Self {
        Self {
            document_a: "ncr".to_string(),
            document_b: "singapore".to_string(),
            label_a: "UAE".to_string(),
            label_b: "Singapore".to_string(),
            page_size: 1000,
        }
    }
}

impl ClimateConfig {
    /// Document name used by the paragraph endpoints for `side`.
    pub fn document(&self, side: Side) -> &str {
        match side {
            Side::A => &self.document_a,
            Side::B => &self.document_b,
        }
    }

    pub fn label(&self, side: Side) -> &str {
        match side {
            Side::A => &self.label_a,
            Side::B => &self.label_b,
        }
    }

    /// Resolve `a`/`b`, a document name, or a label to a side.
    pub fn parse_side(&self, token: &str) -> Option<Side> {
        let token = token.trim();
        Side::BOTH.into_iter().find(|&side| {
            token.eq_ignore_ascii_case(side.as_str())
                || token.eq_ignore_ascii_case(self.document(side))
                || token.eq_ignore_ascii_case(self.label(side))
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Fuzzy tolerance, 0.0 (exact) to 1.0 (anything).
    pub tolerance: f64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self { tolerance: 0.2 }
    }
}

impl Config {
    /// Read and validate a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Config = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    /// Load `./docdiff.toml` when present, defaults otherwise.
    pub fn discover() -> Result<Self, ConfigError> {
        Self::discover_in(Path::new("."))
    }

    pub fn discover_in(dir: &Path) -> Result<Self, ConfigError> {
        let path: PathBuf = dir.join(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(contents).map_err(|source| ConfigError::Parse {
            path: PathBuf::from("<inline>"),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.base_url.trim().is_empty() {
            return Err(ConfigError::Invalid("server.base_url is empty".into()));
        }
        if self.server.timeout_secs == 0 {
            return Err(ConfigError::Invalid("server.timeout_secs must be > 0".into()));
        }
        let (a, b) = (&self.sides.a.suffix, &self.sides.b.suffix);
        if a.is_empty() || b.is_empty() {
            return Err(ConfigError::Invalid("side suffixes must be non-empty".into()));
        }
        if a == b {
            return Err(ConfigError::Invalid(format!(
                "sides share the suffix '{a}'"
            )));
        }
        if self.climate.document_a == self.climate.document_b {
            return Err(ConfigError::Invalid(
                "climate documents must differ".into(),
            ));
        }
        if !(0.0..=1.0).contains(&self.search.tolerance) {
            return Err(ConfigError::Invalid(format!(
                "search.tolerance {} is outside 0.0..=1.0",
                self.search.tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_is_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.server.base_url, "https://docdiff.mooo.com");
        assert_eq!(config.climate.document(Side::A), "ncr");
        assert_eq!(config.climate.document(Side::B), "singapore");
        assert_eq!(config.climate.page_size, 1000);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = Config::from_toml_str(
            r#"
            [server]
            timeout_secs = 3

            [sides.b]
            label = "Queensland"
            slug = "qld"
            suffix = "_QLD"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.timeout_secs, 3);
        assert_eq!(config.server.retries, 1);
        assert_eq!(config.sides.a.suffix, "_NSW");
        assert_eq!(config.sides.classify("9_QLD"), Some(Side::B));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            Config::from_toml_str("[server]\ntimeout_secs = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[search]\ntolerance = 1.5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[climate]\ndocument_b = \"ncr\""),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("[server\n"),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn load_and_discover_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::discover_in(dir.path()).unwrap(), Config::default());

        let path = dir.path().join(DEFAULT_CONFIG_FILE);
        fs::write(&path, "[server]\nbase_url = \"http://localhost:8000\"\n").unwrap();
        let config = Config::discover_in(dir.path()).unwrap();
        assert_eq!(config.server.base_url, "http://localhost:8000");
        assert_eq!(Config::load(&path).unwrap(), config);
    }

    #[test]
    fn missing_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("nope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn climate_side_tokens() {
        let climate = ClimateConfig::default();
        assert_eq!(climate.parse_side("NCR"), Some(Side::A));
        assert_eq!(climate.parse_side("uae"), Some(Side::A));
        assert_eq!(climate.parse_side("singapore"), Some(Side::B));
        assert_eq!(climate.parse_side("b"), Some(Side::B));
        assert_eq!(climate.parse_side("mars"), None);
    }
}
