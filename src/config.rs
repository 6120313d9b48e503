//! YAML configuration for a RouteIQ deployment.
//!
//! One file describes the normalizer, the classifier backend and the routing
//! policy. Every section is optional and falls back to its defaults.
//!
//! ## Example YAML Configuration
//!
//! ```yaml
//! version: "1.0"
//! name: "helpdesk-prod"
//! log_level: "info"
//! log_json: true
//!
//! normalize:
//!   version: 1
//!   normalize_unicode: true
//!   remove_stop_words: true
//!   lemmatize: true
//!   extra_stop_words: ["regards", "thanks"]
//!
//! classifier:
//!   backend: linear
//!   model_dir: /srv/routeiq/models
//!
//! routing:
//!   vendor: zammad
//!   default_department_id: 1
//!   default_priority: normal
//!   relaxed: true
//!   group_prefix: "Users - "
//!   department_aliases:
//!     customer service: Support
//!   min_department_confidence: 0.3
//! ```
//!
//! ## Environment
//!
//! - `ROUTEIQ_CONFIG`: path of the YAML file when none is given explicitly.
//! - `ROUTEIQ_MODEL_DIR`: overrides `classifier.model_dir`.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use classify::{ClassifierSettings, ClassificationService};
use normalize::NormalizeConfig;
use routing::{PriorityLevel, ReconcileOptions, Reconciler, RoutingDefaults, Vendor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const CONFIG_ENV: &str = "ROUTEIQ_CONFIG";
pub const MODEL_DIR_ENV: &str = "ROUTEIQ_MODEL_DIR";

/// Failure to read, parse or validate a RouteIQ config file.
#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("cannot read routeiq config: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("invalid routeiq config YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("invalid routeiq config: {0}")]
    Validation(String),

    #[error("unsupported routeiq config version {0:?}, expected \"1\"")]
    UnsupportedVersion(String),
}

/// Top-level YAML configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RouteIqConfig {
    /// Configuration format version
    pub version: String,

    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub normalize: NormalizeConfig,

    #[serde(default)]
    pub classifier: ClassifierSettings,

    #[serde(default)]
    pub routing: RoutingYamlConfig,

    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines.
    #[serde(default)]
    pub log_json: bool,
}

impl RouteIqConfig {
    /// Read and validate the YAML file at `path`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigLoadError> {
        let content = fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    /// Parse and validate an in-memory YAML document.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigLoadError> {
        let config: RouteIqConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve the configuration the binary runs with.
    ///
    /// `path` wins over `ROUTEIQ_CONFIG`; with neither, defaults are used.
    /// `ROUTEIQ_MODEL_DIR` is applied last.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigLoadError> {
        Self::load_with(path, |key| std::env::var(key).ok())
    }

    /// [`load`](Self::load) with an injectable environment lookup.
    pub fn load_with<F>(path: Option<&Path>, env: F) -> Result<Self, ConfigLoadError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let from_env = env(CONFIG_ENV).filter(|p| !p.trim().is_empty()).map(PathBuf::from);
        let mut config = match path.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        if let Some(dir) = env(MODEL_DIR_ENV).filter(|d| !d.trim().is_empty()) {
            config.classifier.model_dir = PathBuf::from(dir);
        }
        config.validate()?;
        Ok(config)
    }

    /// Check the version and every section.
    pub fn validate(&self) -> Result<(), ConfigLoadError> {
        match self.version.as_str() {
            "1.0" | "1" => Ok(()),
            v => Err(ConfigLoadError::UnsupportedVersion(v.to_string())),
        }?;

        self.normalize
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("normalize: {e}")))?;
        self.classifier
            .validate()
            .map_err(|e| ConfigLoadError::Validation(format!("classifier: {e}")))?;
        self.routing.validate()?;

        if self.log_level.trim().is_empty() {
            return Err(ConfigLoadError::Validation(
                "log_level must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Load the classifier described by this config. Artifact problems are fatal.
    pub fn classification_service(&self) -> Result<ClassificationService, classify::ClassifyError> {
        ClassificationService::load(&self.classifier, self.normalize.clone())
    }
}

impl Default for RouteIqConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            name: None,
            normalize: NormalizeConfig::default(),
            classifier: ClassifierSettings::default(),
            routing: RoutingYamlConfig::default(),
            log_level: default_log_level(),
            log_json: false,
        }
    }
}

/// Routing policy YAML configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingYamlConfig {
    #[serde(default = "default_vendor")]
    pub vendor: Vendor,

    #[serde(default)]
    pub default_department_id: Option<u64>,

    #[serde(default = "default_safe_department_id")]
    pub safe_department_id: u64,

    #[serde(default)]
    pub default_priority: PriorityLevel,

    #[serde(default)]
    pub relaxed: bool,

    #[serde(default)]
    pub group_prefix: Option<String>,

    #[serde(default)]
    pub department_aliases: BTreeMap<String, String>,

    #[serde(default)]
    pub min_department_confidence: Option<f32>,
}

impl RoutingYamlConfig {
    fn validate(&self) -> Result<(), ConfigLoadError> {
        if let Some(min) = self.min_department_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(ConfigLoadError::Validation(format!(
                    "routing.min_department_confidence must be within [0, 1], got {min}"
                )));
            }
        }
        if let Some((from, _)) = self
            .department_aliases
            .iter()
            .find(|(from, to)| from.trim().is_empty() || to.trim().is_empty())
        {
            return Err(ConfigLoadError::Validation(format!(
                "routing.department_aliases has a blank entry near {from:?}"
            )));
        }
        Ok(())
    }

    pub fn defaults(&self) -> RoutingDefaults {
        RoutingDefaults {
            department_id: self.default_department_id,
            safe_department_id: self.safe_department_id,
            priority: self.default_priority,
        }
    }

    pub fn options(&self) -> ReconcileOptions {
        ReconcileOptions {
            relaxed: self.relaxed,
            group_prefix: self.group_prefix.clone(),
            department_aliases: self.department_aliases.clone(),
            min_department_confidence: self.min_department_confidence,
        }
    }

    pub fn reconciler(&self) -> Reconciler {
        Reconciler::new(self.vendor.adapter(), self.options())
    }
}

impl Default for RoutingYamlConfig {
    fn default() -> Self {
        Self {
            vendor: default_vendor(),
            default_department_id: None,
            safe_department_id: default_safe_department_id(),
            default_priority: PriorityLevel::Normal,
            relaxed: false,
            group_prefix: None,
            department_aliases: BTreeMap::new(),
            min_department_confidence: None,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}
fn default_vendor() -> Vendor {
    Vendor::Zammad
}
fn default_safe_department_id() -> u64 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;
    use classify::ClassifierBackend;
    use std::collections::HashMap;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_valid_yaml() {
        let yaml = r#"
version: "1.0"
name: "test config"
normalize:
  extra_stop_words: ["regards"]
routing:
  vendor: zendesk
  default_department_id: 42
"#;

        let config = RouteIqConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.version, "1.0");
        assert_eq!(config.name, Some("test config".to_string()));
        assert_eq!(config.normalize.extra_stop_words, vec!["regards"]);
        assert!(config.normalize.lemmatize);
        assert_eq!(config.routing.vendor, Vendor::Zendesk);
        assert_eq!(config.routing.defaults().department_id, Some(42));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_load_from_file() {
        let yaml = r#"
version: "1"
classifier:
  backend: keyword
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(yaml.as_bytes()).unwrap();

        let config = RouteIqConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.classifier.backend, ClassifierBackend::Keyword);
    }

    #[test]
    fn test_default_config() {
        let config = RouteIqConfig::default();
        assert_eq!(config.version, "1.0");
        assert!(config.name.is_none());
        assert_eq!(config.routing.vendor, Vendor::Zammad);
        assert_eq!(config.routing.safe_department_id, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unsupported_version() {
        let err = RouteIqConfig::from_yaml("version: \"2.0\"\n").unwrap_err();
        assert!(matches!(err, ConfigLoadError::UnsupportedVersion(v) if v == "2.0"));
    }

    #[test]
    fn test_normalize_validation() {
        let yaml = r#"
version: "1.0"
normalize:
  version: 0
"#;
        let err = RouteIqConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("normalize"));
    }

    #[test]
    fn test_confidence_gate_validation() {
        let yaml = r#"
version: "1.0"
routing:
  min_department_confidence: 1.5
"#;
        let err = RouteIqConfig::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("min_department_confidence"));
    }

    #[test]
    fn test_routing_section_builds_policy() {
        let yaml = r#"
version: "1.0"
routing:
  vendor: zammad
  relaxed: true
  group_prefix: "Users - "
  default_priority: low
  department_aliases:
    customer service: Support
"#;
        let config = RouteIqConfig::from_yaml(yaml).unwrap();
        let options = config.routing.options();
        assert!(options.relaxed);
        assert_eq!(options.group_prefix.as_deref(), Some("Users - "));
        assert_eq!(
            options.department_aliases.get("customer service").map(String::as_str),
            Some("Support")
        );
        assert_eq!(config.routing.defaults().priority, PriorityLevel::Low);
        assert_eq!(config.routing.reconciler().adapter().vendor(), Vendor::Zammad);
    }

    #[test]
    fn test_env_lookup_selects_file_and_model_dir() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"version: \"1.0\"\nlog_level: debug\n")
            .unwrap();

        let env: HashMap<&str, String> = HashMap::from([
            (CONFIG_ENV, temp_file.path().display().to_string()),
            (MODEL_DIR_ENV, "/opt/models".to_string()),
        ]);
        let config = RouteIqConfig::load_with(None, |k| env.get(k).cloned()).unwrap();
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.classifier.model_dir, PathBuf::from("/opt/models"));
    }

    #[test]
    fn test_explicit_path_beats_env() {
        let mut explicit = NamedTempFile::new().unwrap();
        explicit.write_all(b"version: \"1\"\nlog_json: true\n").unwrap();

        let env: HashMap<&str, String> =
            HashMap::from([(CONFIG_ENV, "/does/not/exist.yaml".to_string())]);
        let config = RouteIqConfig::load_with(Some(explicit.path()), |k| env.get(k).cloned()).unwrap();
        assert!(config.log_json);
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let err = RouteIqConfig::load_with(Some(Path::new("/does/not/exist.yaml")), |_| None)
            .unwrap_err();
        assert!(matches!(err, ConfigLoadError::FileRead(_)));
    }

    #[test]
    fn test_no_file_uses_defaults() {
        let config = RouteIqConfig::load_with(None, |_| None).unwrap();
        assert_eq!(config.classifier.model_dir, PathBuf::from("models"));
    }
}
