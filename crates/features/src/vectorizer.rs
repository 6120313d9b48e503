//! TF-IDF vectorizer artifact and error types.
//!
//! The vectorizer is fitted offline and shipped as a JSON artifact. This
//! module only loads, validates and applies it; nothing here learns weights.
//!
//! ```json
//! {
//!   "version": "2024.1",
//!   "vocabulary": { "printer": 0, "invoice": 1 },
//!   "idf": [2.1, 1.7],
//!   "sublinear_tf": false,
//!   "norm": "l2",
//!   "ngram_range": [1, 1]
//! }
//! ```

use std::fs;
use std::path::Path;

use fxhash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vector::FeatureVector;

/// Errors raised while loading or validating a vectorizer artifact.
///
/// Extraction itself never fails: unknown tokens are ignored and empty input
/// maps to the zero vector.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeatureError {
    #[error("invalid vectorizer artifact: {0}")]
    InvalidArtifact(String),
    #[error("failed to read vectorizer artifact {path}: {reason}")]
    Io { path: String, reason: String },
    #[error("failed to parse vectorizer artifact: {0}")]
    Parse(String),
}

/// Row normalization applied after TF-IDF weighting.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TfidfNorm {
    #[default]
    L2,
    None,
}

/// On-disk shape of the vectorizer artifact.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TfidfArtifact {
    /// Free-form artifact version, surfaced in logs.
    #[serde(default)]
    pub version: Option<String>,
    /// Term to column index.
    pub vocabulary: std::collections::BTreeMap<String, usize>,
    /// Inverse document frequency per column.
    pub idf: Vec<f32>,
    /// Use `1 + ln(tf)` instead of raw counts.
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: TfidfNorm,
    /// Inclusive word n-gram range.
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

/// A validated, immutable TF-IDF vectorizer.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    version: Option<String>,
    vocabulary: FxHashMap<String, usize>,
    idf: Vec<f32>,
    sublinear_tf: bool,
    norm: TfidfNorm,
    ngram_range: (usize, usize),
}

impl TfidfVectorizer {
    /// Validate an artifact and build the vectorizer.
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self, FeatureError> {
        let TfidfArtifact {
            version,
            vocabulary,
            idf,
            sublinear_tf,
            norm,
            ngram_range,
        } = artifact;

        if vocabulary.is_empty() {
            return Err(FeatureError::InvalidArtifact("vocabulary is empty".into()));
        }
        if idf.len() != vocabulary.len() {
            return Err(FeatureError::InvalidArtifact(format!(
                "idf has {} entries but vocabulary has {} terms",
                idf.len(),
                vocabulary.len()
            )));
        }
        if let Some(bad) = idf.iter().position(|w| !w.is_finite()) {
            return Err(FeatureError::InvalidArtifact(format!(
                "idf weight at column {bad} is not finite"
            )));
        }
        let (min_n, max_n) = ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(FeatureError::InvalidArtifact(format!(
                "ngram_range ({min_n}, {max_n}) must satisfy 1 <= min <= max"
            )));
        }

        let dim = idf.len();
        let mut seen = vec![false; dim];
        let mut table = FxHashMap::default();
        table.reserve(vocabulary.len());
        for (term, col) in vocabulary {
            if col >= dim {
                return Err(FeatureError::InvalidArtifact(format!(
                    "term {term:?} maps to column {col} outside dimension {dim}"
                )));
            }
            if seen[col] {
                return Err(FeatureError::InvalidArtifact(format!(
                    "column {col} is assigned to more than one term"
                )));
            }
            seen[col] = true;
            table.insert(term, col);
        }

        Ok(Self {
            version,
            vocabulary: table,
            idf,
            sublinear_tf,
            norm,
            ngram_range,
        })
    }

    /// Parse and validate a JSON artifact.
    pub fn from_json(json: &str) -> Result<Self, FeatureError> {
        let artifact: TfidfArtifact =
            serde_json::from_str(json).map_err(|e| FeatureError::Parse(e.to_string()))?;
        Self::from_artifact(artifact)
    }

    /// Read, parse and validate a JSON artifact file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FeatureError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| FeatureError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Self::from_json(&json)
    }

    /// Export back to the on-disk shape.
    pub fn to_artifact(&self) -> TfidfArtifact {
        TfidfArtifact {
            version: self.version.clone(),
            vocabulary: self
                .vocabulary
                .iter()
                .map(|(term, col)| (term.clone(), *col))
                .collect(),
            idf: self.idf.clone(),
            sublinear_tf: self.sublinear_tf,
            norm: self.norm,
            ngram_range: self.ngram_range,
        }
    }

    /// Output dimension (vocabulary size).
    pub fn dim(&self) -> usize {
        self.idf.len()
    }

    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Column assigned to `term`, if it is in the vocabulary.
    pub fn column(&self, term: &str) -> Option<usize> {
        self.vocabulary.get(term).copied()
    }

    /// Convert canonical tokens into a TF-IDF vector.
    ///
    /// Tokens outside the vocabulary are ignored. An empty sequence, or one
    /// made only of unknown terms, yields the zero vector.
    pub fn extract<S: AsRef<str>>(&self, tokens: &[S]) -> FeatureVector {
        let mut values = vec![0.0f32; self.dim()];
        let (min_n, max_n) = self.ngram_range;

        for n in min_n..=max_n {
            if tokens.len() < n {
                break;
            }
            for window in tokens.windows(n) {
                let col = if n == 1 {
                    self.column(window[0].as_ref())
                } else {
                    let gram = window
                        .iter()
                        .map(|t| t.as_ref())
                        .collect::<Vec<_>>()
                        .join(" ");
                    self.column(&gram)
                };
                if let Some(col) = col {
                    values[col] += 1.0;
                }
            }
        }

        for (value, idf) in values.iter_mut().zip(self.idf.iter()) {
            if *value > 0.0 {
                let tf = if self.sublinear_tf {
                    1.0 + value.ln()
                } else {
                    *value
                };
                *value = tf * idf;
            }
        }

        if self.norm == TfidfNorm::L2 {
            l2_normalize_in_place(&mut values);
        }

        FeatureVector::new(values)
    }
}

/// In-place L2 normalization. The zero vector stays zero.
pub(crate) fn l2_normalize_in_place(v: &mut [f32]) {
    let norm_sq: f32 = v.iter().map(|x| x * x).sum();
    if norm_sq > 0.0 {
        let inv_norm = norm_sq.sqrt().recip();
        for x in v.iter_mut() {
            *x *= inv_norm;
        }
    }
}
