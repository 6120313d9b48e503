//! Workspace umbrella crate for RouteIQ.
//!
//! Stitches the pipeline stages together so a vendor integration needs a
//! single entry point:
//!
//! ```text
//! TicketText -> normalize -> features -> classify -> reconcile -> RoutingDecision
//! ```
//!
//! The stage crates stay usable on their own; this crate re-exports their
//! public types, owns YAML configuration ([`config`]) and reports stage
//! latency to an optional global [`PipelineMetrics`] observer.
//!
//! ```no_run
//! use routeiq::{config::RouteIqConfig, CatalogSnapshot, Router, TicketText};
//!
//! let config = RouteIqConfig::load(None)?;
//! let router = Router::from_config(&config)?;
//!
//! let catalog = CatalogSnapshot::new()
//!     .with_group(1, "Users")
//!     .with_group(7, "IT Support");
//! let routed = router.route(
//!     &TicketText::new("Printer", "My printer is not working"),
//!     &catalog,
//!     None,
//! )?;
//! println!("group {} priority {}", routed.decision.department_id, routed.decision.priority_id);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod config;

pub use classify::{
    ArtifactBundle, ArtifactPaths, Classification, ClassificationService, ClassifierBackend,
    ClassifierSettings, ClassifyError, KeywordModel, LabelPrediction, TicketModel, TicketText,
};
pub use features::{FeatureError, FeatureVector, TfidfVectorizer};
pub use normalize::{normalize, NormalizeConfig, NormalizeError, NormalizedText};
pub use routing::{
    reconcile, CatalogGroup, CatalogPriority, CatalogSnapshot, DepartmentMatch, PredictedLabels,
    PriorityCode, PriorityLevel, ReconcileOptions, Reconciler, RoutingDecision, RoutingDefaults,
    Vendor, VendorAdapter, ZammadAdapter, ZendeskAdapter,
};

use std::sync::{Arc, OnceLock, RwLock};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn, Level};

/// Errors that can occur while routing a ticket through the pipeline.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("classification failure: {0}")]
    Classify(#[from] ClassifyError),
    #[error("normalization failure: {0}")]
    Normalize(#[from] NormalizeError),
}

/// Metrics observer for pipeline stages.
pub trait PipelineMetrics: Send + Sync {
    fn record_classify(&self, latency: Duration, result: Result<(), ClassifyError>);
    fn record_reconcile(&self, latency: Duration, used_default: bool);
}

/// Install or clear the global pipeline metrics recorder.
pub fn set_pipeline_metrics(recorder: Option<Arc<dyn PipelineMetrics>>) {
    let lock = metrics_lock();
    let mut guard = lock.write().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = recorder;
}

fn metrics_lock() -> &'static RwLock<Option<Arc<dyn PipelineMetrics>>> {
    static METRICS: OnceLock<RwLock<Option<Arc<dyn PipelineMetrics>>>> = OnceLock::new();
    METRICS.get_or_init(|| RwLock::new(None))
}

fn metrics_recorder() -> Option<Arc<dyn PipelineMetrics>> {
    let guard = metrics_lock()
        .read()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    guard.clone()
}

struct MetricsSpan {
    recorder: Arc<dyn PipelineMetrics>,
    start: Instant,
}

impl MetricsSpan {
    fn start() -> Option<Self> {
        metrics_recorder().map(|recorder| Self {
            recorder,
            start: Instant::now(),
        })
    }

    fn record_classify(self, result: Result<(), ClassifyError>) {
        self.recorder.record_classify(self.start.elapsed(), result);
    }

    fn record_reconcile(self, used_default: bool) {
        self.recorder
            .record_reconcile(self.start.elapsed(), used_default);
    }
}

/// Classification plus the routing decision derived from it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutedTicket {
    pub classification: Classification,
    pub decision: RoutingDecision,
}

/// Normalize a ticket exactly as the classifier does.
pub fn normalize_ticket(
    text: &TicketText,
    cfg: &NormalizeConfig,
) -> Result<NormalizedText, PipelineError> {
    Ok(normalize(&text.combined(), cfg)?)
}

/// Classify a ticket, reporting the outcome to the metrics recorder.
pub fn classify_ticket(
    service: &ClassificationService,
    text: &TicketText,
) -> Result<Classification, PipelineError> {
    let mut span = MetricsSpan::start();
    match service.classify(text) {
        Ok(classification) => {
            if let Some(span) = span.take() {
                span.record_classify(Ok(()));
            }
            Ok(classification)
        }
        Err(err) => {
            if let Some(span) = span.take() {
                span.record_classify(Err(err.clone()));
            }
            Err(PipelineError::Classify(err))
        }
    }
}

/// Classify, then reconcile against `catalog`.
///
/// Only classification can fail; reconciliation always yields a decision.
pub fn route(
    service: &ClassificationService,
    reconciler: &Reconciler,
    text: &TicketText,
    catalog: &CatalogSnapshot,
    defaults: &RoutingDefaults,
    explicit_group: Option<&str>,
) -> Result<RoutedTicket, PipelineError> {
    let start = Instant::now();
    let span = tracing::span!(
        Level::INFO,
        "routeiq.route",
        vendor = reconciler.adapter().vendor().as_str(),
        groups = catalog.groups.len()
    );
    let _guard = span.enter();

    let classification = match classify_ticket(service, text) {
        Ok(classification) => classification,
        Err(err) => {
            let elapsed_micros = start.elapsed().as_micros();
            warn!(error = %err, elapsed_micros, "route_failure");
            return Err(err);
        }
    };

    let metrics = MetricsSpan::start();
    let decision = reconciler.reconcile_with_override(
        &PredictedLabels::from(&classification),
        catalog,
        defaults,
        explicit_group,
    );
    if let Some(span) = metrics {
        span.record_reconcile(decision.used_default);
    }

    let elapsed_micros = start.elapsed().as_micros();
    info!(
        department = %classification.department.label,
        priority = %classification.priority.label,
        department_id = decision.department_id,
        priority_id = %decision.priority_id,
        matched = decision.matched,
        elapsed_micros,
        "route_success"
    );

    Ok(RoutedTicket {
        classification,
        decision,
    })
}

/// A loaded classifier together with the routing policy of one deployment.
#[derive(Debug, Clone)]
pub struct Router {
    service: ClassificationService,
    reconciler: Reconciler,
    defaults: RoutingDefaults,
}

impl Router {
    pub fn new(
        service: ClassificationService,
        reconciler: Reconciler,
        defaults: RoutingDefaults,
    ) -> Self {
        Self {
            service,
            reconciler,
            defaults,
        }
    }

    /// Load the classifier and routing policy named by `config`.
    pub fn from_config(config: &config::RouteIqConfig) -> Result<Self, PipelineError> {
        let service = config.classification_service()?;
        Ok(Self::new(
            service,
            config.routing.reconciler(),
            config.routing.defaults(),
        ))
    }

    pub fn service(&self) -> &ClassificationService {
        &self.service
    }

    pub fn reconciler(&self) -> &Reconciler {
        &self.reconciler
    }

    pub fn defaults(&self) -> &RoutingDefaults {
        &self.defaults
    }

    pub fn classify(&self, text: &TicketText) -> Result<Classification, PipelineError> {
        classify_ticket(&self.service, text)
    }

    pub fn route(
        &self,
        text: &TicketText,
        catalog: &CatalogSnapshot,
        explicit_group: Option<&str>,
    ) -> Result<RoutedTicket, PipelineError> {
        route(
            &self.service,
            &self.reconciler,
            text,
            catalog,
            &self.defaults,
            explicit_group,
        )
    }
}
