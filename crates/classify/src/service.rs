use std::sync::Arc;
use std::time::Instant;

use normalize::{normalize, NormalizeConfig};
use tracing::{info, warn, Level};

use crate::assets::ArtifactBundle;
use crate::config::{ClassifierBackend, ClassifierSettings};
use crate::keyword::KeywordModel;
use crate::model::{ModelInput, TicketModel};
use crate::types::{Classification, TicketText};
use crate::ClassifyError;

#[derive(Clone)]
enum ModelState {
    Ready(Arc<dyn TicketModel>),
    Unavailable(String),
}

/// Single entry point: ticket text in, department and priority out.
///
/// Cheap to clone; the model is shared behind an `Arc`.
#[derive(Clone)]
pub struct ClassificationService {
    normalize_cfg: NormalizeConfig,
    model: ModelState,
}

impl std::fmt::Debug for ClassificationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("ClassificationService");
        s.field("normalize_cfg", &self.normalize_cfg);
        match &self.model {
            ModelState::Ready(model) => s.field("model", &model.name()),
            ModelState::Unavailable(reason) => s.field("unavailable", reason),
        };
        s.finish()
    }
}

impl ClassificationService {
    /// Wrap an already loaded model.
    pub fn new(
        model: Arc<dyn TicketModel>,
        normalize_cfg: NormalizeConfig,
    ) -> Result<Self, ClassifyError> {
        normalize_cfg.validate()?;
        Ok(Self {
            normalize_cfg,
            model: ModelState::Ready(model),
        })
    }

    /// A service whose every `classify` call fails with `ModelUnavailable`.
    pub fn unavailable(reason: impl Into<String>, normalize_cfg: NormalizeConfig) -> Self {
        Self {
            normalize_cfg,
            model: ModelState::Unavailable(reason.into()),
        }
    }

    /// Load the configured backend. Any artifact problem is fatal.
    pub fn load(
        settings: &ClassifierSettings,
        normalize_cfg: NormalizeConfig,
    ) -> Result<Self, ClassifyError> {
        let start = Instant::now();
        settings.validate()?;
        normalize_cfg.validate()?;

        let model: Arc<dyn TicketModel> = match settings.backend {
            ClassifierBackend::Keyword => Arc::new(KeywordModel::default()),
            ClassifierBackend::Linear => {
                let paths = settings.artifact_paths();
                match ArtifactBundle::load(&paths) {
                    Ok(bundle) => {
                        info!(
                            fingerprint = %bundle.fingerprint(),
                            version = ?bundle.version(),
                            dim = bundle.dim(),
                            departments = bundle.department_classes().len(),
                            priorities = bundle.priority_classes().len(),
                            "model_load_success"
                        );
                        Arc::new(bundle)
                    }
                    Err(err) => {
                        let elapsed_micros = start.elapsed().as_micros();
                        warn!(
                            model_dir = %settings.model_dir.display(),
                            error = %err,
                            elapsed_micros,
                            "model_load_failure"
                        );
                        return Err(err);
                    }
                }
            }
        };

        Ok(Self {
            normalize_cfg,
            model: ModelState::Ready(model),
        })
    }

    /// Like [`load`](Self::load), but keeps the host alive on failure.
    ///
    /// The returned service reports `ModelUnavailable` on every call instead
    /// of substituting a default label.
    pub fn load_or_unavailable(settings: &ClassifierSettings, normalize_cfg: NormalizeConfig) -> Self {
        match Self::load(settings, normalize_cfg.clone()) {
            Ok(service) => service,
            Err(err) => Self::unavailable(err.to_string(), normalize_cfg),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.model, ModelState::Ready(_))
    }

    /// Backend name, or `None` while unavailable.
    pub fn backend(&self) -> Option<&'static str> {
        match &self.model {
            ModelState::Ready(model) => Some(model.name()),
            ModelState::Unavailable(_) => None,
        }
    }

    pub fn fingerprint(&self) -> Option<&str> {
        match &self.model {
            ModelState::Ready(model) => model.fingerprint(),
            ModelState::Unavailable(_) => None,
        }
    }

    pub fn normalize_config(&self) -> &NormalizeConfig {
        &self.normalize_cfg
    }

    /// Normalize, extract and predict both targets.
    ///
    /// Fails only when the model is unavailable; empty or unusual text always
    /// produces labels.
    pub fn classify(&self, text: &TicketText) -> Result<Classification, ClassifyError> {
        let start = Instant::now();
        let model = match &self.model {
            ModelState::Ready(model) => model,
            ModelState::Unavailable(reason) => {
                let err = ClassifyError::ModelUnavailable(reason.clone());
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "classify_failure");
                return Err(err);
            }
        };

        let span = tracing::span!(Level::INFO, "classify.classify", backend = model.name());
        let _guard = span.enter();

        let raw = text.combined();
        let normalized = match normalize(&raw, &self.normalize_cfg) {
            Ok(normalized) => normalized,
            Err(err) => {
                let err = ClassifyError::from(err);
                let elapsed_micros = start.elapsed().as_micros();
                warn!(error = %err, elapsed_micros, "classify_failure");
                return Err(err);
            }
        };

        let classification = model.predict(&ModelInput {
            raw: &raw,
            normalized: &normalized,
        });

        let elapsed_micros = start.elapsed().as_micros();
        info!(
            department = %classification.department.label,
            department_confidence = classification.department.confidence,
            priority = %classification.priority.label,
            priority_confidence = classification.priority.confidence,
            from_prior = classification.department.from_prior || classification.priority.from_prior,
            tokens = normalized.len(),
            elapsed_micros,
            "classify_success"
        );
        Ok(classification)
    }

    /// Convenience for integrations that only carry a description.
    pub fn classify_description(&self, description: &str) -> Result<Classification, ClassifyError> {
        self.classify(&TicketText::description_only(description))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_backend_needs_no_artifacts() {
        let service =
            ClassificationService::load(&ClassifierSettings::keyword(), NormalizeConfig::default())
                .unwrap();
        assert!(service.is_ready());
        assert_eq!(service.backend(), Some("keyword"));
        assert_eq!(service.fingerprint(), None);

        let c = service
            .classify(&TicketText::new("Invoice", "payment is urgent"))
            .unwrap();
        assert_eq!(c.department.label, "Billing");
        assert_eq!(c.priority.label, "high");
    }

    #[test]
    fn missing_artifacts_fail_load() {
        let settings = ClassifierSettings::linear("/definitely/not/a/model/dir");
        let err = ClassificationService::load(&settings, NormalizeConfig::default()).unwrap_err();
        assert!(matches!(err, ClassifyError::ModelUnavailable(_)));
    }

    #[test]
    fn unavailable_service_rejects_every_call() {
        let settings = ClassifierSettings::linear("/definitely/not/a/model/dir");
        let service = ClassificationService::load_or_unavailable(&settings, NormalizeConfig::default());
        assert!(!service.is_ready());
        assert_eq!(service.backend(), None);
        for text in ["", "printer broken"] {
            let err = service.classify_description(text).unwrap_err();
            assert!(matches!(err, ClassifyError::ModelUnavailable(_)));
        }
    }

    #[test]
    fn invalid_normalize_config_is_rejected() {
        let cfg = NormalizeConfig {
            version: 0,
            ..Default::default()
        };
        let err = ClassificationService::new(Arc::new(KeywordModel::default()), cfg).unwrap_err();
        assert!(matches!(err, ClassifyError::InvalidConfig(_)));
    }

    #[test]
    fn empty_text_still_classifies() {
        let service =
            ClassificationService::new(Arc::new(KeywordModel::default()), NormalizeConfig::default())
                .unwrap();
        let c = service.classify(&TicketText::default()).unwrap();
        assert!(c.department.from_prior);
        assert!((0.0..=1.0).contains(&c.priority.confidence));
    }
}
