//! The fixed-dimension numeric vector handed to the label predictors.

use serde::{Deserialize, Serialize};

/// Dense TF-IDF feature vector.
///
/// The dimension equals the vocabulary size of the vectorizer that produced
/// it and is fixed at artifact load time. The vector is immutable once built;
/// predictors only read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    values: Vec<f32>,
}

impl FeatureVector {
    pub fn new(values: Vec<f32>) -> Self {
        Self { values }
    }

    /// The all-zero vector of dimension `dim`. Produced for empty input.
    pub fn zeros(dim: usize) -> Self {
        Self {
            values: vec![0.0; dim],
        }
    }

    pub fn dim(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Number of non-zero components.
    pub fn nnz(&self) -> usize {
        self.values.iter().filter(|v| **v != 0.0).count()
    }

    /// True when no vocabulary term was observed.
    pub fn is_zero(&self) -> bool {
        self.values.iter().all(|v| *v == 0.0)
    }

    /// `(column, value)` pairs for every non-zero component, ascending by column.
    pub fn iter_nonzero(&self) -> impl Iterator<Item = (usize, f32)> + '_ {
        self.values
            .iter()
            .copied()
            .enumerate()
            .filter(|(_, v)| *v != 0.0)
    }

    /// Dot product against a weight row. Rows shorter or longer than the
    /// vector are truncated to the common prefix.
    pub fn dot(&self, weights: &[f32]) -> f32 {
        self.iter_nonzero()
            .filter_map(|(col, v)| weights.get(col).map(|w| w * v))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_vector_is_zero() {
        let v = FeatureVector::zeros(4);
        assert_eq!(v.dim(), 4);
        assert!(v.is_zero());
        assert_eq!(v.nnz(), 0);
        assert_eq!(v.dot(&[1.0, 2.0, 3.0, 4.0]), 0.0);
    }

    #[test]
    fn dot_uses_nonzero_components() {
        let v = FeatureVector::new(vec![0.0, 0.5, 0.0, 2.0]);
        assert_eq!(v.nnz(), 2);
        assert!((v.dot(&[9.0, 2.0, 9.0, 0.25]) - 1.5).abs() < 1e-6);
        let pairs: Vec<_> = v.iter_nonzero().collect();
        assert_eq!(pairs, vec![(1, 0.5), (3, 2.0)]);
    }
}
