use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::assets::ArtifactPaths;
use crate::ClassifyError;

/// Which [`TicketModel`](crate::TicketModel) implementation to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierBackend {
    /// TF-IDF + logistic regression artifacts.
    #[default]
    Linear,
    /// Keyword rules; needs no artifacts.
    Keyword,
}

/// Where the model comes from.
///
/// Per-file overrides take precedence over `model_dir`.
///
/// ```yaml
/// backend: linear
/// model_dir: /srv/routeiq/models
/// priority_model: /srv/routeiq/experiments/prio.json
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierSettings {
    pub backend: ClassifierBackend,
    pub model_dir: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vectorizer: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_encoder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_encoder: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub department_model: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority_model: Option<PathBuf>,
}

impl Default for ClassifierSettings {
    fn default() -> Self {
        Self {
            backend: ClassifierBackend::Linear,
            model_dir: PathBuf::from("models"),
            vectorizer: None,
            department_encoder: None,
            priority_encoder: None,
            department_model: None,
            priority_model: None,
        }
    }
}

impl ClassifierSettings {
    /// Linear backend reading the standard file names from `dir`.
    pub fn linear(dir: impl Into<PathBuf>) -> Self {
        Self {
            model_dir: dir.into(),
            ..Default::default()
        }
    }

    pub fn keyword() -> Self {
        Self {
            backend: ClassifierBackend::Keyword,
            ..Default::default()
        }
    }

    pub fn validate(&self) -> Result<(), ClassifyError> {
        if self.backend == ClassifierBackend::Linear && self.model_dir.as_os_str().is_empty() {
            return Err(ClassifyError::InvalidConfig(
                "model_dir must not be empty for the linear backend".into(),
            ));
        }
        Ok(())
    }

    /// Resolved artifact locations.
    pub fn artifact_paths(&self) -> ArtifactPaths {
        let mut paths = ArtifactPaths::in_dir(&self.model_dir);
        if let Some(p) = &self.vectorizer {
            paths.vectorizer = p.clone();
        }
        if let Some(p) = &self.department_encoder {
            paths.department_encoder = p.clone();
        }
        if let Some(p) = &self.priority_encoder {
            paths.priority_encoder = p.clone();
        }
        if let Some(p) = &self.department_model {
            paths.department_model = p.clone();
        }
        if let Some(p) = &self.priority_model {
            paths.priority_model = p.clone();
        }
        paths
    }
}
