use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Closed set of urgency levels every vendor code is derived from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriorityLevel {
    Low,
    #[default]
    Normal,
    High,
}

impl PriorityLevel {
    pub const ALL: [PriorityLevel; 3] = [PriorityLevel::Low, PriorityLevel::Normal, PriorityLevel::High];

    pub fn as_str(self) -> &'static str {
        match self {
            PriorityLevel::Low => "low",
            PriorityLevel::Normal => "normal",
            PriorityLevel::High => "high",
        }
    }

    /// Map a predicted priority label through the alias table.
    ///
    /// Case and surrounding whitespace are ignored. Returns `None` for labels
    /// outside the table.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "low" | "lowest" | "minor" => Some(PriorityLevel::Low),
            "normal" | "medium" | "moderate" | "default" => Some(PriorityLevel::Normal),
            "high" | "highest" | "urgent" | "critical" => Some(PriorityLevel::High),
            _ => None,
        }
    }
}

impl fmt::Display for PriorityLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vendor representation of a priority.
///
/// Zammad addresses priorities by numeric id, Zendesk by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PriorityCode {
    Numeric(u64),
    Named(String),
}

impl fmt::Display for PriorityCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriorityCode::Numeric(id) => write!(f, "{id}"),
            PriorityCode::Named(name) => f.write_str(name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogGroup {
    pub id: u64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogPriority {
    pub id: u64,
    pub name: String,
}

/// Point-in-time read of a vendor's groups and priorities.
///
/// Owned by the caller and passed per request; the reconciler never caches it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSnapshot {
    #[serde(default)]
    pub groups: Vec<CatalogGroup>,
    #[serde(default)]
    pub priorities: Vec<CatalogPriority>,
}

impl CatalogSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_group(mut self, id: u64, name: impl Into<String>) -> Self {
        self.groups.push(CatalogGroup {
            id,
            name: name.into(),
        });
        self
    }

    pub fn with_priority(mut self, id: u64, name: impl Into<String>) -> Self {
        self.priorities.push(CatalogPriority {
            id,
            name: name.into(),
        });
        self
    }

    pub fn group(&self, id: u64) -> Option<&CatalogGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Group with the smallest id, independent of listing order.
    pub fn lowest_group(&self) -> Option<&CatalogGroup> {
        self.groups.iter().min_by_key(|g| g.id)
    }
}

/// What to use when the prediction cannot be matched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoutingDefaults {
    /// Preferred fallback department.
    pub department_id: Option<u64>,
    /// Last resort when neither the configured id nor any catalog group exists.
    pub safe_department_id: u64,
    /// Level used for unrecognized priority labels.
    pub priority: PriorityLevel,
}

impl Default for RoutingDefaults {
    fn default() -> Self {
        Self {
            department_id: None,
            // Zammad's stock "Users" group.
            safe_department_id: 1,
            priority: PriorityLevel::Normal,
        }
    }
}

impl RoutingDefaults {
    pub fn with_department(department_id: u64) -> Self {
        Self {
            department_id: Some(department_id),
            ..Default::default()
        }
    }
}

/// Matching knobs. Everything beyond exact matching is opt-in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileOptions {
    /// Enable alias, prefix and substring matching after the exact pass.
    pub relaxed: bool,
    /// Naming convention in front of department groups, e.g. `"Users - "`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_prefix: Option<String>,
    /// Predicted name to catalog group name. Keys are compared normalized.
    pub department_aliases: BTreeMap<String, String>,
    /// Route to the default when the department confidence is below this.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_department_confidence: Option<f32>,
}

/// The labels the reconciler works from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictedLabels {
    pub department: String,
    #[serde(default = "full_confidence")]
    pub department_confidence: f32,
    pub priority: String,
}

fn full_confidence() -> f32 {
    1.0
}

impl PredictedLabels {
    pub fn new(department: impl Into<String>, priority: impl Into<String>) -> Self {
        Self {
            department: department.into(),
            department_confidence: 1.0,
            priority: priority.into(),
        }
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.department_confidence = confidence;
        self
    }
}

#[cfg(feature = "with_classify")]
impl From<&classify::Classification> for PredictedLabels {
    fn from(c: &classify::Classification) -> Self {
        Self {
            department: c.department.label.clone(),
            department_confidence: c.department.confidence,
            priority: c.priority.label.clone(),
        }
    }
}

/// How the department id was chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepartmentMatch {
    /// The caller named a group that exists in the catalog.
    Explicit,
    /// Normalized predicted name equals a catalog group name.
    Exact,
    /// Alias, prefix or substring match.
    Relaxed,
    /// Nothing matched; the default policy picked the id.
    Default,
}

/// Final routing answer. Both ids are always populated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub department_id: u64,
    pub priority_id: PriorityCode,
    pub matched: bool,
    pub used_default: bool,
    pub department_match: DepartmentMatch,
    /// Catalog name of the chosen group, when it is in the catalog.
    pub department_name: Option<String>,
    pub priority: PriorityLevel,
    /// The predicted priority was not recognized.
    pub priority_fallback: bool,
    /// Suggested group name (prefix applied) when the department defaulted.
    pub unmatched_department: Option<String>,
}
