//! # RouteIQ Classification
//!
//! Turns ticket text into a department and a priority label.
//!
//! ```text
//! TicketText -> normalize -> TF-IDF vector -> department predictor
//!                                          -> priority predictor
//! ```
//!
//! Both predictors share one feature vector. Each pairs a pre-fit linear
//! classifier with a label encoder; see [`linear`] for the decision rules.
//!
//! ## Failure model
//!
//! - Text never causes an error. Empty input maps to the zero vector and each
//!   predictor answers with its prior class at confidence `0.0`.
//! - Missing, corrupt or mismatched artifacts are reported as
//!   [`ClassifyError::ModelUnavailable`] when the model is loaded.
//!   [`ClassificationService::load`] fails fast;
//!   [`ClassificationService::load_or_unavailable`] keeps the host running
//!   but rejects every request.
//!
//! ## Backends
//!
//! The facade talks to a [`TicketModel`]. Two ship with the crate:
//! [`ArtifactBundle`] (TF-IDF + logistic regression, the default) and
//! [`KeywordModel`] (substring rules, no artifacts).
//!
//! ## Example
//!
//! ```no_run
//! use classify::{ClassificationService, ClassifierSettings, TicketText};
//! use normalize::NormalizeConfig;
//!
//! let service = ClassificationService::load(
//!     &ClassifierSettings::linear("models"),
//!     NormalizeConfig::default(),
//! )?;
//! let out = service.classify(&TicketText::new(
//!     "Printer",
//!     "My printer is not working and I have an important deadline",
//! ))?;
//! println!("{} / {}", out.department.label, out.priority.label);
//! # Ok::<(), classify::ClassifyError>(())
//! ```

mod assets;
mod config;
mod encoder;
mod error;
mod keyword;
pub mod linear;
mod model;
mod service;
mod types;

pub use crate::assets::{
    ArtifactBundle, ArtifactPaths, ArtifactSet, DEPARTMENT_ENCODER_FILE, DEPARTMENT_MODEL_FILE,
    PRIORITY_ENCODER_FILE, PRIORITY_MODEL_FILE, VECTORIZER_FILE,
};
pub use crate::config::{ClassifierBackend, ClassifierSettings};
pub use crate::encoder::LabelEncoder;
pub use crate::error::ClassifyError;
pub use crate::keyword::{KeywordModel, KeywordRule};
pub use crate::linear::{LabelPredictor, LinearArtifact, LinearClassifier, MultiClass};
pub use crate::model::{ModelInput, TicketModel};
pub use crate::service::ClassificationService;
pub use crate::types::{Classification, LabelPrediction, TicketText};
