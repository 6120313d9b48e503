//! RouteIQ text normalization layer.
//!
//! Turns raw ticket text into the canonical token sequence the feature
//! extractor consumes. The steps mirror the preprocessing the model artifacts
//! were fitted with:
//!
//! - Unicode NFKC normalization (configurable)
//! - Drop everything that is not an ASCII letter or whitespace
//! - Lowercase
//! - Remove English stop words
//! - Reduce tokens to their noun lemma
//!
//! ## Pure function guarantee
//!
//! No I/O, no clock calls, no locale dependence. Same text + same config gives
//! the same tokens on any machine, which is what makes predictions
//! reproducible.
//!
//! Empty or whitespace-only input is not an error; it yields an empty token
//! sequence and the downstream predictors fall back to their prior class.

mod config;
mod error;
mod lemma;
mod pipeline;
mod stopwords;
mod text;
mod whitespace;

pub use crate::config::NormalizeConfig;
pub use crate::error::NormalizeError;
pub use crate::lemma::lemmatize;
pub use crate::pipeline::normalize;
pub use crate::stopwords::is_stop_word;
pub use crate::text::NormalizedText;
pub use crate::whitespace::collapse_whitespace;
