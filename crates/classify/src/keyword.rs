//! Rule-based backend used before trained artifacts exist.
//!
//! Rules are substring checks over the lowercased raw text, evaluated in
//! order; the first rule with a hit wins. Confidence grows with the number of
//! matching keywords (`1 - 0.5^hits`). When nothing matches, the fallback
//! label is reported as a prior with zero confidence.

use crate::model::{ModelInput, TicketModel};
use crate::types::{Classification, LabelPrediction};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordRule {
    pub label: String,
    pub keywords: Vec<String>,
}

impl KeywordRule {
    pub fn new(label: &str, keywords: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
        }
    }

    fn hits(&self, text: &str) -> usize {
        self.keywords
            .iter()
            .filter(|k| text.contains(k.as_str()))
            .count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeywordModel {
    department_rules: Vec<KeywordRule>,
    department_fallback: String,
    priority_rules: Vec<KeywordRule>,
    priority_fallback: String,
}

impl Default for KeywordModel {
    fn default() -> Self {
        Self {
            department_rules: vec![
                KeywordRule::new("Billing", &["billing", "invoice", "payment"]),
                KeywordRule::new("Support", &["login", "auth", "password", "account"]),
                KeywordRule::new("Product", &["feature", "request", "roadmap"]),
            ],
            department_fallback: "Support".into(),
            priority_rules: vec![
                KeywordRule::new(
                    "high",
                    &["urgent", "outage", "down", "error", "failed", "critical"],
                ),
                KeywordRule::new("normal", &["slow", "delay", "issue"]),
            ],
            priority_fallback: "low".into(),
        }
    }
}

impl KeywordModel {
    pub fn new(
        department_rules: Vec<KeywordRule>,
        department_fallback: impl Into<String>,
        priority_rules: Vec<KeywordRule>,
        priority_fallback: impl Into<String>,
    ) -> Self {
        Self {
            department_rules,
            department_fallback: department_fallback.into(),
            priority_rules,
            priority_fallback: priority_fallback.into(),
        }
    }
}

fn apply(rules: &[KeywordRule], fallback: &str, text: &str) -> LabelPrediction {
    for rule in rules {
        let hits = rule.hits(text);
        if hits > 0 {
            let confidence = 1.0 - 0.5f32.powi(hits as i32);
            return LabelPrediction::new(rule.label.clone(), confidence);
        }
    }
    LabelPrediction::prior(fallback)
}

impl TicketModel for KeywordModel {
    fn name(&self) -> &'static str {
        "keyword"
    }

    fn predict(&self, input: &ModelInput<'_>) -> Classification {
        let text = input.raw.to_lowercase();
        Classification {
            department: apply(&self.department_rules, &self.department_fallback, &text),
            priority: apply(&self.priority_rules, &self.priority_fallback, &text),
        }
    }
}
