//! Pre-fit linear classifiers and the label predictor built on them.
//!
//! The weights are produced offline by a logistic-regression fit. Three
//! decision rules are supported, matching how such models are exported:
//!
//! | `coef` rows | classes | `multi_class`   | probabilities                       |
//! |-------------|---------|-----------------|-------------------------------------|
//! | 1           | 2       | any             | `sigmoid(s)`, class 1 when `>= 0.5` |
//! | k           | k       | `multinomial`   | `softmax(s)`                        |
//! | k           | k       | `ovr`           | `sigmoid(s_i) / sum(sigmoid(s))`    |
//!
//! where `s = coef · x + intercept`.

use features::FeatureVector;
use serde::{Deserialize, Serialize};

use crate::encoder::LabelEncoder;
use crate::types::LabelPrediction;
use crate::ClassifyError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MultiClass {
    #[default]
    Multinomial,
    Ovr,
}

/// On-disk shape of a classifier artifact.
///
/// ```json
/// {
///   "coef": [[0.0, 3.0], [1.5, -0.5]],
///   "intercept": [0.1, -0.2],
///   "multi_class": "multinomial"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearArtifact {
    #[serde(default)]
    pub version: Option<String>,
    pub coef: Vec<Vec<f32>>,
    pub intercept: Vec<f32>,
    #[serde(default)]
    pub multi_class: MultiClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Decision {
    Binary,
    Multinomial,
    Ovr,
}

/// Validated linear classifier over a fixed feature dimension.
#[derive(Debug, Clone)]
pub struct LinearClassifier {
    coef: Vec<Vec<f32>>,
    intercept: Vec<f32>,
    decision: Decision,
    n_classes: usize,
}

impl LinearClassifier {
    /// Check the artifact against the class count and feature dimension.
    pub fn from_artifact(
        artifact: LinearArtifact,
        n_classes: usize,
        dim: usize,
    ) -> Result<Self, ClassifyError> {
        let LinearArtifact {
            coef,
            intercept,
            multi_class,
            ..
        } = artifact;

        if n_classes < 2 {
            return Err(unavailable(format!(
                "classifier needs at least two classes, encoder has {n_classes}"
            )));
        }

        let decision = if n_classes == 2 && coef.len() == 1 {
            Decision::Binary
        } else if coef.len() == n_classes {
            match multi_class {
                MultiClass::Multinomial => Decision::Multinomial,
                MultiClass::Ovr => Decision::Ovr,
            }
        } else {
            return Err(unavailable(format!(
                "classifier has {} coefficient rows for {n_classes} classes",
                coef.len()
            )));
        };

        if intercept.len() != coef.len() {
            return Err(unavailable(format!(
                "classifier has {} intercepts for {} coefficient rows",
                intercept.len(),
                coef.len()
            )));
        }
        for (row_idx, row) in coef.iter().enumerate() {
            if row.len() != dim {
                return Err(unavailable(format!(
                    "coefficient row {row_idx} has width {} but the vectorizer dimension is {dim}",
                    row.len()
                )));
            }
            if row.iter().any(|w| !w.is_finite()) {
                return Err(unavailable(format!(
                    "coefficient row {row_idx} contains a non-finite weight"
                )));
            }
        }
        if intercept.iter().any(|b| !b.is_finite()) {
            return Err(unavailable("intercept contains a non-finite value".into()));
        }

        Ok(Self {
            coef,
            intercept,
            decision,
            n_classes,
        })
    }

    pub fn n_classes(&self) -> usize {
        self.n_classes
    }

    pub fn dim(&self) -> usize {
        self.coef.first().map(Vec::len).unwrap_or(0)
    }

    /// Raw decision scores, one per coefficient row.
    pub fn decision_function(&self, x: &FeatureVector) -> Vec<f32> {
        self.coef
            .iter()
            .zip(self.intercept.iter())
            .map(|(row, b)| x.dot(row) + b)
            .collect()
    }

    /// Class probabilities, one per class, summing to 1.
    pub fn predict_proba(&self, x: &FeatureVector) -> Vec<f32> {
        let scores = self.decision_function(x);
        match self.decision {
            Decision::Binary => {
                let p1 = sigmoid(scores[0]);
                vec![1.0 - p1, p1]
            }
            Decision::Multinomial => softmax(&scores),
            Decision::Ovr => {
                let mut probs: Vec<f32> = scores.into_iter().map(sigmoid).collect();
                let total: f32 = probs.iter().sum();
                if total > 0.0 {
                    for p in probs.iter_mut() {
                        *p /= total;
                    }
                }
                probs
            }
        }
    }

    /// Winning class index and its probability.
    ///
    /// Binary models pick class 1 when its probability is at least 0.5.
    /// Otherwise ties resolve to the lowest class index.
    pub fn best_class(&self, x: &FeatureVector) -> (usize, f32) {
        let probs = self.predict_proba(x);
        if self.decision == Decision::Binary {
            let idx = usize::from(probs[1] >= 0.5);
            return (idx, probs[idx]);
        }
        argmax(&probs)
    }

    /// Class chosen when no feature fired: argmax of the intercept.
    pub fn prior_index(&self) -> usize {
        match self.decision {
            Decision::Binary => usize::from(self.intercept[0] >= 0.0),
            Decision::Multinomial | Decision::Ovr => argmax(&self.intercept).0,
        }
    }
}

/// A classifier paired with the encoder that names its outputs.
#[derive(Debug, Clone)]
pub struct LabelPredictor {
    classifier: LinearClassifier,
    encoder: LabelEncoder,
}

impl LabelPredictor {
    pub fn new(
        encoder: LabelEncoder,
        artifact: LinearArtifact,
        dim: usize,
    ) -> Result<Self, ClassifyError> {
        let classifier = LinearClassifier::from_artifact(artifact, encoder.len(), dim)?;
        Ok(Self {
            classifier,
            encoder,
        })
    }

    pub fn classes(&self) -> &[String] {
        self.encoder.classes()
    }

    pub fn classifier(&self) -> &LinearClassifier {
        &self.classifier
    }

    /// Most probable label for `x`.
    ///
    /// The zero vector carries no evidence: the prior class is returned with
    /// confidence `0.0` and `from_prior` set.
    pub fn predict(&self, x: &FeatureVector) -> LabelPrediction {
        if x.is_zero() {
            return LabelPrediction::prior(self.label(self.classifier.prior_index()));
        }
        let (idx, p) = self.classifier.best_class(x);
        LabelPrediction::new(self.label(idx), p)
    }

    fn label(&self, index: usize) -> String {
        // Index is always within range: the classifier was validated against the encoder.
        self.encoder
            .decode(index)
            .map(str::to_owned)
            .unwrap_or_default()
    }
}

fn unavailable(reason: String) -> ClassifyError {
    ClassifyError::ModelUnavailable(reason)
}

fn sigmoid(z: f32) -> f32 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn softmax(scores: &[f32]) -> Vec<f32> {
    let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = scores.iter().map(|s| (s - max).exp()).collect();
    let total: f32 = exps.iter().sum();
    exps.into_iter().map(|e| e / total).collect()
}

/// First index holding the maximum value.
fn argmax(values: &[f32]) -> (usize, f32) {
    let mut best = (0, f32::NEG_INFINITY);
    for (i, v) in values.iter().copied().enumerate() {
        if v > best.1 {
            best = (i, v);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encoder(classes: &[&str]) -> LabelEncoder {
        LabelEncoder::new(classes.iter().map(|c| c.to_string()).collect()).unwrap()
    }

    fn artifact(coef: Vec<Vec<f32>>, intercept: Vec<f32>) -> LinearArtifact {
        LinearArtifact {
            version: None,
            coef,
            intercept,
            multi_class: MultiClass::Multinomial,
        }
    }

    #[test]
    fn multinomial_picks_highest_score() {
        let p = LabelPredictor::new(
            encoder(&["Billing", "IT Support"]),
            artifact(vec![vec![3.0, 0.0], vec![0.0, 3.0]], vec![0.0, 0.0]),
            2,
        )
        .unwrap();
        let pred = p.predict(&FeatureVector::new(vec![0.0, 1.0]));
        assert_eq!(pred.label, "IT Support");
        assert!(!pred.from_prior);
        // softmax([0, 3])
        let expected = 1.0 / (1.0 + (-3.0f32).exp());
        assert!((pred.confidence - expected).abs() < 1e-6);
    }

    #[test]
    fn probabilities_sum_to_one() {
        let clf = LinearClassifier::from_artifact(
            artifact(
                vec![vec![1.0, 0.5], vec![0.2, 0.1], vec![-1.0, 2.0]],
                vec![0.1, 0.0, -0.3],
            ),
            3,
            2,
        )
        .unwrap();
        let probs = clf.predict_proba(&FeatureVector::new(vec![0.6, 0.8]));
        assert_eq!(probs.len(), 3);
        let total: f32 = probs.iter().sum();
        assert!((total - 1.0).abs() < 1e-5);
        assert!(probs.iter().all(|p| (0.0..=1.0).contains(p)));
    }

    #[test]
    fn binary_model_uses_sigmoid_threshold() {
        let p = LabelPredictor::new(
            encoder(&["Low", "High"]),
            artifact(vec![vec![4.0, -4.0]], vec![0.0]),
            2,
        )
        .unwrap();
        assert_eq!(p.predict(&FeatureVector::new(vec![1.0, 0.0])).label, "High");
        assert_eq!(p.predict(&FeatureVector::new(vec![0.0, 1.0])).label, "Low");

        // Exactly 0.5 goes to class 1.
        let pred = p.predict(&FeatureVector::new(vec![0.5, 0.5]));
        assert_eq!(pred.label, "High");
        assert!((pred.confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn ovr_normalizes_sigmoids() {
        let mut art = artifact(vec![vec![2.0], vec![0.0]], vec![0.0, 0.0]);
        art.multi_class = MultiClass::Ovr;
        let clf = LinearClassifier::from_artifact(art, 2, 1).unwrap();
        let probs = clf.predict_proba(&FeatureVector::new(vec![1.0]));
        let s1 = 1.0 / (1.0 + (-2.0f32).exp());
        let expected = s1 / (s1 + 0.5);
        assert!((probs[0] - expected).abs() < 1e-6);
        assert!((probs[0] + probs[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn zero_vector_returns_prior_with_zero_confidence() {
        let p = LabelPredictor::new(
            encoder(&["High", "Low", "Medium"]),
            artifact(
                vec![vec![1.0], vec![1.0], vec![1.0]],
                vec![-0.3, 0.0, 0.4],
            ),
            1,
        )
        .unwrap();
        let pred = p.predict(&FeatureVector::zeros(1));
        assert_eq!(pred.label, "Medium");
        assert_eq!(pred.confidence, 0.0);
        assert!(pred.from_prior);
    }

    #[test]
    fn binary_prior_follows_intercept_sign() {
        let p = LabelPredictor::new(
            encoder(&["no", "yes"]),
            artifact(vec![vec![1.0]], vec![-0.1]),
            1,
        )
        .unwrap();
        assert_eq!(p.predict(&FeatureVector::zeros(1)).label, "no");
    }

    #[test]
    fn ties_resolve_to_lowest_index() {
        let p = LabelPredictor::new(
            encoder(&["a", "b"]),
            artifact(vec![vec![1.0], vec![1.0]], vec![0.0, 0.0]),
            1,
        )
        .unwrap();
        assert_eq!(p.predict(&FeatureVector::new(vec![1.0])).label, "a");
    }

    #[test]
    fn shape_mismatches_are_model_unavailable() {
        let enc = encoder(&["a", "b", "c"]);
        let err = LabelPredictor::new(
            enc.clone(),
            artifact(vec![vec![1.0], vec![1.0]], vec![0.0, 0.0]),
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("coefficient rows"));

        let err = LabelPredictor::new(
            enc.clone(),
            artifact(vec![vec![1.0], vec![1.0], vec![1.0, 2.0]], vec![0.0; 3]),
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("vectorizer dimension"));

        let err = LabelPredictor::new(
            enc.clone(),
            artifact(vec![vec![1.0], vec![1.0], vec![1.0]], vec![0.0; 2]),
            1,
        )
        .unwrap_err();
        assert!(err.to_string().contains("intercepts"));

        let err = LabelPredictor::new(
            enc,
            artifact(vec![vec![1.0], vec![f32::INFINITY], vec![1.0]], vec![0.0; 3]),
            1,
        )
        .unwrap_err();
        assert!(matches!(err, ClassifyError::ModelUnavailable(_)));
    }

    #[test]
    fn single_class_encoder_is_rejected() {
        let err = LabelPredictor::new(encoder(&["only"]), artifact(vec![vec![1.0]], vec![0.0]), 1)
            .unwrap_err();
        assert!(err.to_string().contains("at least two classes"));
    }
}
