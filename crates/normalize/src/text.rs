//! Output type of the normalizer.

use serde::{Deserialize, Serialize};

/// The canonical token sequence produced from raw ticket text.
///
/// For a fixed [`NormalizeConfig`](crate::NormalizeConfig) version and input,
/// the same `NormalizedText` is produced on any machine, at any time.
///
/// ```rust
/// use normalize::{normalize, NormalizeConfig};
///
/// let out = normalize("The printers are jammed!", &NormalizeConfig::default()).unwrap();
/// assert_eq!(out.tokens, vec!["printer", "jammed"]);
/// assert_eq!(out.text, "printer jammed");
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NormalizedText {
    /// Canonical tokens in input order.
    pub tokens: Vec<String>,
    /// Tokens joined by single ASCII spaces.
    pub text: String,
    /// Config version that produced this output.
    pub version: u32,
}

impl NormalizedText {
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}
