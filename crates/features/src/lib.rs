//! # RouteIQ Feature Extraction
//!
//! Converts the canonical token sequence produced by the normalizer into a
//! fixed-dimension TF-IDF [`FeatureVector`] using a vocabulary and IDF table
//! fitted before deployment.
//!
//! ## Contract
//!
//! - Consumes canonical tokens only; it never lowercases, strips or stems.
//! - Pure function of `(tokens, vectorizer)`: no I/O after load, no clocks,
//!   no global state.
//! - Out-of-vocabulary tokens are ignored, not errors.
//! - An empty token sequence produces the zero vector, which the predictors
//!   map onto their prior class.
//!
//! ## Weighting
//!
//! 1. Count vocabulary hits per column (word n-grams inside `ngram_range`).
//! 2. Optionally damp counts with `1 + ln(tf)` (`sublinear_tf`).
//! 3. Multiply by the per-column IDF.
//! 4. L2-normalize the row (`norm = "l2"`).
//!
//! ## Example Usage
//!
//! ```
//! use features::TfidfVectorizer;
//!
//! let vectorizer = TfidfVectorizer::from_json(r#"{
//!     "vocabulary": { "printer": 0, "invoice": 1 },
//!     "idf": [2.0, 1.5]
//! }"#).unwrap();
//!
//! let v = vectorizer.extract(&["printer", "jammed"]);
//! assert_eq!(v.dim(), 2);
//! assert!((v.values()[0] - 1.0).abs() < 1e-6);
//! assert!(vectorizer.extract::<&str>(&[]).is_zero());
//! ```

pub mod vector;
pub mod vectorizer;

pub use crate::vector::FeatureVector;
pub use crate::vectorizer::{FeatureError, TfidfArtifact, TfidfNorm, TfidfVectorizer};

#[cfg(feature = "with_normalize")]
impl TfidfVectorizer {
    /// Extract features straight from the normalizer output.
    pub fn extract_normalized(&self, text: &normalize::NormalizedText) -> FeatureVector {
        self.extract(text.tokens())
    }
}
