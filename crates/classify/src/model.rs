//! The seam between the facade and a concrete model backend.

use normalize::NormalizedText;
use tracing::debug;

use crate::assets::ArtifactBundle;
use crate::types::Classification;

/// What a backend sees for one ticket.
#[derive(Debug, Clone, Copy)]
pub struct ModelInput<'a> {
    /// `subject + "\n" + description` before normalization.
    pub raw: &'a str,
    pub normalized: &'a NormalizedText,
}

/// A loaded, immutable model able to label tickets.
///
/// Implementations are shared across threads and must be pure: the same
/// input always yields the same [`Classification`].
pub trait TicketModel: Send + Sync {
    /// Short backend name for logs.
    fn name(&self) -> &'static str;

    fn predict(&self, input: &ModelInput<'_>) -> Classification;

    /// Identifies the exact artifact set, when the backend has one.
    fn fingerprint(&self) -> Option<&str> {
        None
    }
}

impl TicketModel for ArtifactBundle {
    fn name(&self) -> &'static str {
        "linear"
    }

    fn predict(&self, input: &ModelInput<'_>) -> Classification {
        let vector = self.vectorizer.extract_normalized(input.normalized);
        debug!(
            tokens = input.normalized.len(),
            nnz = vector.nnz(),
            dim = vector.dim(),
            "features_extracted"
        );
        Classification {
            department: self.department.predict(&vector),
            priority: self.priority.predict(&vector),
        }
    }

    fn fingerprint(&self) -> Option<&str> {
        Some(ArtifactBundle::fingerprint(self))
    }
}
