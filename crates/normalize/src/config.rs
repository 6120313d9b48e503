//! Configuration types for the ticket text normalizer.
//!
//! [`NormalizeConfig`] controls which cleanup steps run before feature
//! extraction. The defaults reproduce the preprocessing the shipped model
//! artifacts were fitted with, so changing them without refitting the model
//! silently degrades predictions.
//!
//! # Versioning
//!
//! The `version` field tracks behavior changes. Bump it whenever a change
//! alters the produced tokens (new stop words, lemma rules, ...) so logs and
//! artifact manifests can tell which normalization produced a vector.
//!
//! # Examples
//!
//! ```rust
//! use normalize::NormalizeConfig;
//!
//! let config = NormalizeConfig::default();
//! assert_eq!(config.version, 1);
//! assert!(config.remove_stop_words);
//! assert!(config.lemmatize);
//! ```
//!
//! ## Keeping stop words
//!
//! ```rust
//! use normalize::NormalizeConfig;
//!
//! let config = NormalizeConfig {
//!     remove_stop_words: false,
//!     ..Default::default()
//! };
//! ```

use serde::{Deserialize, Serialize};

/// Configuration for the normalization pipeline.
///
/// Cheap to clone and serde-friendly so it can be embedded in the YAML
/// configuration of the umbrella crate:
///
/// ```json
/// {
///   "version": 1,
///   "normalize_unicode": true,
///   "remove_stop_words": true,
///   "lemmatize": true,
///   "min_token_len": 1,
///   "extra_stop_words": []
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Behavior version. Must be >= 1; version 0 is reserved and rejected
    /// with [`NormalizeError::InvalidConfig`](crate::NormalizeError::InvalidConfig).
    pub version: u32,

    /// Apply Unicode NFKC normalization before stripping non-letters.
    ///
    /// Compatibility characters such as the `ﬁ` ligature or full-width Latin
    /// letters fold into plain ASCII letters and survive the letter filter
    /// instead of being dropped.
    pub normalize_unicode: bool,

    /// Remove the built-in English stop-word set plus `extra_stop_words`.
    pub remove_stop_words: bool,

    /// Reduce each token to its noun lemma (`printers` -> `printer`).
    pub lemmatize: bool,

    /// Tokens shorter than this (in bytes, after lemmatization) are dropped.
    pub min_token_len: usize,

    /// Deployment-specific stop words (signatures, greetings). Compared
    /// case-insensitively against the lowercased token.
    pub extra_stop_words: Vec<String>,
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        Self {
            version: 1,
            normalize_unicode: true,
            remove_stop_words: true,
            lemmatize: true,
            min_token_len: 1,
            extra_stop_words: Vec::new(),
        }
    }
}

impl NormalizeConfig {
    /// Check the configuration invariants.
    pub fn validate(&self) -> Result<(), crate::NormalizeError> {
        if self.version == 0 {
            return Err(crate::NormalizeError::InvalidConfig(
                "config version must be >= 1".into(),
            ));
        }
        if self.min_token_len == 0 {
            return Err(crate::NormalizeError::InvalidConfig(
                "min_token_len must be >= 1".into(),
            ));
        }
        Ok(())
    }
}
