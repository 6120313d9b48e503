//! Loading of the five model artifacts that make up one deployment.
//!
//! | file                      | contents                          |
//! |---------------------------|-----------------------------------|
//! | `tfidf_vectorizer.json`   | vocabulary + IDF table            |
//! | `le_department.json`      | department class names            |
//! | `le_priority.json`        | priority class names              |
//! | `log_reg_dept_model.json` | department classifier weights     |
//! | `log_reg_prio_model.json` | priority classifier weights       |
//!
//! The bundle is validated as a whole: both classifiers must match the
//! vectorizer dimension and their encoders. Any failure is reported as
//! [`ClassifyError::ModelUnavailable`] naming the offending file.

use std::fs;
use std::path::{Path, PathBuf};

use features::{TfidfArtifact, TfidfVectorizer};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::encoder::LabelEncoder;
use crate::linear::{LabelPredictor, LinearArtifact};
use crate::ClassifyError;

pub const VECTORIZER_FILE: &str = "tfidf_vectorizer.json";
pub const DEPARTMENT_ENCODER_FILE: &str = "le_department.json";
pub const PRIORITY_ENCODER_FILE: &str = "le_priority.json";
pub const DEPARTMENT_MODEL_FILE: &str = "log_reg_dept_model.json";
pub const PRIORITY_MODEL_FILE: &str = "log_reg_prio_model.json";

/// Locations of the five artifact files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub vectorizer: PathBuf,
    pub department_encoder: PathBuf,
    pub priority_encoder: PathBuf,
    pub department_model: PathBuf,
    pub priority_model: PathBuf,
}

impl ArtifactPaths {
    /// Standard file names inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            vectorizer: dir.join(VECTORIZER_FILE),
            department_encoder: dir.join(DEPARTMENT_ENCODER_FILE),
            priority_encoder: dir.join(PRIORITY_ENCODER_FILE),
            department_model: dir.join(DEPARTMENT_MODEL_FILE),
            priority_model: dir.join(PRIORITY_MODEL_FILE),
        }
    }
}

/// Raw, unvalidated artifacts as deserialized from disk.
#[derive(Debug, Clone)]
pub struct ArtifactSet {
    pub vectorizer: TfidfArtifact,
    pub department_encoder: LabelEncoder,
    pub priority_encoder: LabelEncoder,
    pub department_model: LinearArtifact,
    pub priority_model: LinearArtifact,
}

/// The validated, immutable model shared by every request.
#[derive(Debug, Clone)]
pub struct ArtifactBundle {
    pub(crate) vectorizer: TfidfVectorizer,
    pub(crate) department: LabelPredictor,
    pub(crate) priority: LabelPredictor,
    fingerprint: String,
    version: Option<String>,
}

impl ArtifactBundle {
    /// Read, fingerprint and validate all five files.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ClassifyError> {
        let mut hasher = Sha256::new();

        let vectorizer: TfidfArtifact = read_json(&paths.vectorizer, &mut hasher)?;
        let department_encoder: LabelEncoder = read_json(&paths.department_encoder, &mut hasher)?;
        let priority_encoder: LabelEncoder = read_json(&paths.priority_encoder, &mut hasher)?;
        let department_model: LinearArtifact = read_json(&paths.department_model, &mut hasher)?;
        let priority_model: LinearArtifact = read_json(&paths.priority_model, &mut hasher)?;

        let fingerprint = hex::encode(hasher.finalize());
        Self::build(
            ArtifactSet {
                vectorizer,
                department_encoder,
                priority_encoder,
                department_model,
                priority_model,
            },
            fingerprint,
        )
    }

    /// Load the standard file names from `dir`.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self, ClassifyError> {
        Self::load(&ArtifactPaths::in_dir(dir))
    }

    /// Validate in-memory artifacts. The fingerprint covers their JSON form.
    pub fn from_artifacts(set: ArtifactSet) -> Result<Self, ClassifyError> {
        let mut hasher = Sha256::new();
        hash_json(&set.vectorizer, &mut hasher)?;
        hash_json(&set.department_encoder, &mut hasher)?;
        hash_json(&set.priority_encoder, &mut hasher)?;
        hash_json(&set.department_model, &mut hasher)?;
        hash_json(&set.priority_model, &mut hasher)?;
        let fingerprint = hex::encode(hasher.finalize());
        Self::build(set, fingerprint)
    }

    fn build(set: ArtifactSet, fingerprint: String) -> Result<Self, ClassifyError> {
        let ArtifactSet {
            vectorizer,
            department_encoder,
            priority_encoder,
            department_model,
            priority_model,
        } = set;

        let version = vectorizer.version.clone();
        let vectorizer = TfidfVectorizer::from_artifact(vectorizer)
            .map_err(|e| ClassifyError::ModelUnavailable(format!("{VECTORIZER_FILE}: {e}")))?;
        let dim = vectorizer.dim();

        let department = LabelPredictor::new(department_encoder, department_model, dim)
            .map_err(|e| prefixed(DEPARTMENT_MODEL_FILE, e))?;
        let priority = LabelPredictor::new(priority_encoder, priority_model, dim)
            .map_err(|e| prefixed(PRIORITY_MODEL_FILE, e))?;

        Ok(Self {
            vectorizer,
            department,
            priority,
            fingerprint,
            version,
        })
    }

    /// Hex SHA-256 over every artifact, in load order.
    pub fn fingerprint(&self) -> &str {
        &self.fingerprint
    }

    /// Version string declared by the vectorizer artifact.
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    pub fn dim(&self) -> usize {
        self.vectorizer.dim()
    }

    pub fn vectorizer(&self) -> &TfidfVectorizer {
        &self.vectorizer
    }

    pub fn department_classes(&self) -> &[String] {
        self.department.classes()
    }

    pub fn priority_classes(&self) -> &[String] {
        self.priority.classes()
    }
}

fn read_json<T: DeserializeOwned>(path: &Path, hasher: &mut Sha256) -> Result<T, ClassifyError> {
    let bytes = fs::read(path).map_err(|e| {
        ClassifyError::ModelUnavailable(format!("failed to read {}: {e}", path.display()))
    })?;
    hasher.update(&bytes);
    serde_json::from_slice(&bytes).map_err(|e| {
        ClassifyError::ModelUnavailable(format!("failed to parse {}: {e}", path.display()))
    })
}

fn hash_json<T: Serialize>(value: &T, hasher: &mut Sha256) -> Result<(), ClassifyError> {
    let bytes = serde_json::to_vec(value)
        .map_err(|e| ClassifyError::ModelUnavailable(format!("failed to encode artifact: {e}")))?;
    hasher.update(&bytes);
    Ok(())
}

fn prefixed(file: &str, err: ClassifyError) -> ClassifyError {
    match err {
        ClassifyError::ModelUnavailable(reason) => {
            ClassifyError::ModelUnavailable(format!("{file}: {reason}"))
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const VECTORIZER: &str = r#"{
        "version": "test-1",
        "vocabulary": { "printer": 0, "invoice": 1, "urgent": 2 },
        "idf": [2.0, 2.0, 1.5]
    }"#;
    const DEPT_ENCODER: &str = r#"{ "classes": ["Billing", "IT Support"] }"#;
    const PRIO_ENCODER: &str = r#"{ "classes": ["High", "Low", "Medium"] }"#;
    const DEPT_MODEL: &str = r#"{ "coef": [[0.0, 3.0, 0.0], [3.0, 0.0, 0.0]], "intercept": [0.0, 0.1] }"#;
    const PRIO_MODEL: &str = r#"{
        "coef": [[0.0, 0.0, 3.0], [0.0, 1.0, 0.0], [0.5, 0.0, 0.0]],
        "intercept": [-0.3, 0.0, 0.4]
    }"#;

    fn write_bundle(dir: &Path) {
        fs::write(dir.join(VECTORIZER_FILE), VECTORIZER).unwrap();
        fs::write(dir.join(DEPARTMENT_ENCODER_FILE), DEPT_ENCODER).unwrap();
        fs::write(dir.join(PRIORITY_ENCODER_FILE), PRIO_ENCODER).unwrap();
        fs::write(dir.join(DEPARTMENT_MODEL_FILE), DEPT_MODEL).unwrap();
        fs::write(dir.join(PRIORITY_MODEL_FILE), PRIO_MODEL).unwrap();
    }

    #[test]
    fn loads_bundle_from_directory() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path());

        let bundle = ArtifactBundle::load_dir(dir.path()).unwrap();
        assert_eq!(bundle.dim(), 3);
        assert_eq!(bundle.version(), Some("test-1"));
        assert_eq!(bundle.department_classes(), ["Billing", "IT Support"]);
        assert_eq!(bundle.fingerprint().len(), 64);
    }

    #[test]
    fn fingerprint_is_stable_and_content_sensitive() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path());
        let a = ArtifactBundle::load_dir(dir.path()).unwrap();
        let b = ArtifactBundle::load_dir(dir.path()).unwrap();
        assert_eq!(a.fingerprint(), b.fingerprint());

        fs::write(
            dir.path().join(PRIORITY_ENCODER_FILE),
            r#"{ "classes": ["Critical", "Low", "Medium"] }"#,
        )
        .unwrap();
        let c = ArtifactBundle::load_dir(dir.path()).unwrap();
        assert_ne!(a.fingerprint(), c.fingerprint());
    }

    #[test]
    fn missing_file_names_the_path() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path());
        fs::remove_file(dir.path().join(PRIORITY_MODEL_FILE)).unwrap();

        let err = ArtifactBundle::load_dir(dir.path()).unwrap_err();
        assert!(matches!(err, ClassifyError::ModelUnavailable(_)));
        assert!(err.to_string().contains(PRIORITY_MODEL_FILE));
    }

    #[test]
    fn width_mismatch_is_detected_at_load() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path());
        fs::write(
            dir.path().join(DEPARTMENT_MODEL_FILE),
            r#"{ "coef": [[1.0, 0.0], [0.0, 1.0]], "intercept": [0.0, 0.0] }"#,
        )
        .unwrap();

        let err = ArtifactBundle::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains(DEPARTMENT_MODEL_FILE));
        assert!(err.to_string().contains("vectorizer dimension"));
    }

    #[test]
    fn corrupt_json_is_model_unavailable() {
        let dir = TempDir::new().unwrap();
        write_bundle(dir.path());
        fs::write(dir.path().join(VECTORIZER_FILE), "{ truncated").unwrap();

        let err = ArtifactBundle::load_dir(dir.path()).unwrap_err();
        assert!(err.to_string().contains("failed to parse"));
    }
}
