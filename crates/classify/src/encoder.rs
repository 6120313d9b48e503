//! Label encoder artifact: class index to class name.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ClassifyError;

/// Ordered class names. Index `i` is the label of classifier output `i`.
///
/// ```json
/// { "classes": ["Billing", "Customer Service", "IT Support"] }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "EncoderArtifact")]
pub struct LabelEncoder {
    classes: Vec<String>,
}

#[derive(Deserialize)]
struct EncoderArtifact {
    classes: Vec<String>,
}

impl TryFrom<EncoderArtifact> for LabelEncoder {
    type Error = ClassifyError;

    fn try_from(raw: EncoderArtifact) -> Result<Self, Self::Error> {
        LabelEncoder::new(raw.classes)
    }
}

impl LabelEncoder {
    /// Build an encoder, rejecting empty, blank or duplicate class names.
    pub fn new(classes: Vec<String>) -> Result<Self, ClassifyError> {
        if classes.is_empty() {
            return Err(ClassifyError::ModelUnavailable(
                "label encoder has no classes".into(),
            ));
        }
        let mut seen = HashSet::with_capacity(classes.len());
        for class in &classes {
            if class.trim().is_empty() {
                return Err(ClassifyError::ModelUnavailable(
                    "label encoder contains a blank class name".into(),
                ));
            }
            if !seen.insert(class.as_str()) {
                return Err(ClassifyError::ModelUnavailable(format!(
                    "label encoder lists class {class:?} twice"
                )));
            }
        }
        Ok(Self { classes })
    }

    pub fn from_json(json: &str) -> Result<Self, ClassifyError> {
        serde_json::from_str(json)
            .map_err(|e| ClassifyError::ModelUnavailable(format!("label encoder: {e}")))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Label for class index `index`.
    pub fn decode(&self, index: usize) -> Option<&str> {
        self.classes.get(index).map(String::as_str)
    }

    /// Class index of `label` (exact match).
    pub fn encode(&self, label: &str) -> Option<usize> {
        self.classes.iter().position(|c| c == label)
    }
}
