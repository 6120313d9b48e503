use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Ticket text as submitted by the vendor integration.
///
/// Either part may be empty. Empty text still classifies.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketText {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub description: String,
}

impl TicketText {
    pub fn new(subject: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            description: description.into(),
        }
    }

    /// Ticket with a description and no subject.
    pub fn description_only(description: impl Into<String>) -> Self {
        Self::new(String::new(), description)
    }

    /// Text fed to the normalizer: `subject + "\n" + description`.
    ///
    /// A blank subject contributes nothing.
    pub fn combined(&self) -> Cow<'_, str> {
        if self.subject.trim().is_empty() {
            Cow::Borrowed(self.description.as_str())
        } else {
            Cow::Owned(format!("{}\n{}", self.subject, self.description))
        }
    }

    pub fn is_blank(&self) -> bool {
        self.subject.trim().is_empty() && self.description.trim().is_empty()
    }
}

/// One predicted label with its confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelPrediction {
    pub label: String,
    /// Probability of `label`, always within `[0, 1]`.
    pub confidence: f32,
    /// True when no evidence was observed and the label is the model prior.
    #[serde(default)]
    pub from_prior: bool,
}

impl LabelPrediction {
    pub fn new(label: impl Into<String>, confidence: f32) -> Self {
        Self {
            label: label.into(),
            confidence: clamp_confidence(confidence),
            from_prior: false,
        }
    }

    /// Prior class reported with zero confidence.
    pub fn prior(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            confidence: 0.0,
            from_prior: true,
        }
    }
}

fn clamp_confidence(p: f32) -> f32 {
    if p.is_nan() {
        0.0
    } else {
        p.clamp(0.0, 1.0)
    }
}

/// Output of the facade: one prediction per target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub department: LabelPrediction,
    pub priority: LabelPrediction,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn combined_joins_subject_and_description() {
        let t = TicketText::new("Printer", "not working");
        assert_eq!(t.combined(), "Printer\nnot working");
    }

    #[test]
    fn blank_subject_is_skipped() {
        let t = TicketText::new("   ", "not working");
        assert_eq!(t.combined(), "not working");
        assert!(!t.is_blank());
        assert!(TicketText::default().is_blank());
    }

    #[test]
    fn confidence_is_clamped() {
        assert_eq!(LabelPrediction::new("a", 1.5).confidence, 1.0);
        assert_eq!(LabelPrediction::new("a", -0.1).confidence, 0.0);
        assert_eq!(LabelPrediction::new("a", f32::NAN).confidence, 0.0);
        let prior = LabelPrediction::prior("Support");
        assert!(prior.from_prior);
        assert_eq!(prior.confidence, 0.0);
    }
}
