use std::sync::Arc;
use std::time::Instant;

use normalize::collapse_whitespace;
use tracing::{debug, info, Level};

use crate::adapter::VendorAdapter;
use crate::types::{
    CatalogGroup, CatalogSnapshot, DepartmentMatch, PredictedLabels, PriorityLevel,
    ReconcileOptions, RoutingDecision, RoutingDefaults,
};


/// Canonical form used for every department comparison:
/// trimmed, lowercased, internal whitespace collapsed.
pub fn normalize_name(name: &str) -> String {
    collapse_whitespace(name).to_lowercase()
}

/// Maps predicted labels onto a vendor catalog.
///
/// Holds only immutable policy; every call is a pure function of its
/// arguments, so one instance can serve all requests.
#[derive(Clone)]
pub struct Reconciler {
    adapter: Arc<dyn VendorAdapter>,
    options: ReconcileOptions,
}

impl std::fmt::Debug for Reconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reconciler")
            .field("vendor", &self.adapter.vendor())
            .field("options", &self.options)
            .finish()
    }
}

struct DepartmentChoice<'c> {
    group: &'c CatalogGroup,
    how: DepartmentMatch,
}

impl Reconciler {
    pub fn new(adapter: Arc<dyn VendorAdapter>, options: ReconcileOptions) -> Self {
        Self { adapter, options }
    }

    /// Exact matching only.
    pub fn strict(adapter: Arc<dyn VendorAdapter>) -> Self {
        Self::new(adapter, ReconcileOptions::default())
    }

    pub fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    pub fn adapter(&self) -> &dyn VendorAdapter {
        self.adapter.as_ref()
    }

    pub fn reconcile(
        &self,
        prediction: &PredictedLabels,
        catalog: &CatalogSnapshot,
        defaults: &RoutingDefaults,
    ) -> RoutingDecision {
        self.reconcile_with_override(prediction, catalog, defaults, None)
    }

    /// Like [`reconcile`](Self::reconcile), but a caller-supplied group name
    /// that exists in the catalog wins over the prediction. An unknown
    /// explicit name is ignored.
    pub fn reconcile_with_override(
        &self,
        prediction: &PredictedLabels,
        catalog: &CatalogSnapshot,
        defaults: &RoutingDefaults,
        explicit_group: Option<&str>,
    ) -> RoutingDecision {
        let start = Instant::now();
        let span = tracing::span!(
            Level::DEBUG,
            "routing.reconcile",
            vendor = self.adapter.vendor().as_str(),
            department = %prediction.department,
            priority = %prediction.priority
        );
        let _guard = span.enter();

        let (priority, priority_fallback) = match PriorityLevel::from_label(&prediction.priority) {
            Some(level) => (level, false),
            None => (defaults.priority, true),
        };
        let priority_id = self.adapter.resolve_priority(priority, catalog);

        let gated = self.below_confidence_gate(prediction);
        let choice = explicit_group
            .and_then(|name| {
                let found = find_exact(catalog, &normalize_name(name));
                if found.is_none() {
                    debug!(explicit_group = name, "explicit_group_not_in_catalog");
                }
                found
            })
            .map(|group| DepartmentChoice {
                group,
                how: DepartmentMatch::Explicit,
            })
            .or_else(|| {
                if gated {
                    None
                } else {
                    self.match_prediction(prediction, catalog)
                }
            });

        let decision = match choice {
            Some(DepartmentChoice { group, how }) => RoutingDecision {
                department_id: self.adapter.resolve_department(group),
                priority_id,
                matched: true,
                used_default: false,
                department_match: how,
                department_name: Some(group.name.clone()),
                priority,
                priority_fallback,
                unmatched_department: None,
            },
            None => {
                let (department_id, department_name) = self.default_department(catalog, defaults);
                RoutingDecision {
                    department_id,
                    priority_id,
                    matched: false,
                    used_default: true,
                    department_match: DepartmentMatch::Default,
                    department_name,
                    priority,
                    priority_fallback,
                    // Gated predictions get no suggestion.
                    unmatched_department: if gated {
                        None
                    } else {
                        self.suggest_group_name(catalog, &prediction.department)
                    },
                }
            }
        };

        let elapsed_micros = start.elapsed().as_micros();
        if decision.used_default {
            info!(
                department_id = decision.department_id,
                priority_id = %decision.priority_id,
                unmatched = ?decision.unmatched_department,
                priority_fallback,
                elapsed_micros,
                "reconcile_default"
            );
        } else {
            debug!(
                department_id = decision.department_id,
                department_match = ?decision.department_match,
                priority_id = %decision.priority_id,
                priority_fallback,
                elapsed_micros,
                "reconcile_matched"
            );
        }
        decision
    }

    /// NaN confidences never pass a configured gate.
    fn below_confidence_gate(&self, prediction: &PredictedLabels) -> bool {
        let Some(min) = self.options.min_department_confidence else {
            return false;
        };
        let gated = !(prediction.department_confidence >= min);
        if gated {
            debug!(
                confidence = prediction.department_confidence,
                min_confidence = min,
                "department_below_confidence_gate"
            );
        }
        gated
    }

    fn match_prediction<'c>(
        &self,
        prediction: &PredictedLabels,
        catalog: &'c CatalogSnapshot,
    ) -> Option<DepartmentChoice<'c>> {
        let wanted = normalize_name(&prediction.department);
        if wanted.is_empty() {
            return None;
        }

        if let Some(group) = find_exact(catalog, &wanted) {
            return Some(DepartmentChoice {
                group,
                how: DepartmentMatch::Exact,
            });
        }

        if !self.options.relaxed {
            return None;
        }
        self.find_relaxed(catalog, &prediction.department, &wanted)
            .map(|group| DepartmentChoice {
                group,
                how: DepartmentMatch::Relaxed,
            })
    }

    /// Alias, then prefix, then substring. First hit wins.
    fn find_relaxed<'c>(
        &self,
        catalog: &'c CatalogSnapshot,
        raw: &str,
        wanted: &str,
    ) -> Option<&'c CatalogGroup> {
        let alias_target = self
            .options
            .department_aliases
            .iter()
            .find(|(from, _)| normalize_name(from) == wanted)
            .map(|(_, to)| normalize_name(to));
        if let Some(target) = alias_target {
            if let Some(group) = find_exact(catalog, &target) {
                return Some(group);
            }
        }

        if let Some(prefix) = self.options.group_prefix.as_deref() {
            let prefixed = normalize_name(&format!("{prefix}{}", raw.trim()));
            if let Some(group) = find_exact(catalog, &prefixed) {
                return Some(group);
            }
        }

        let wanted_words: Vec<&str> = wanted.split_whitespace().collect();
        catalog
            .groups
            .iter()
            .filter_map(|g| {
                let name = normalize_name(&g.name);
                if name.is_empty() {
                    return None;
                }
                let words: Vec<&str> = name.split_whitespace().collect();
                (contains_word_run(&words, &wanted_words) || contains_word_run(&wanted_words, &words))
                    .then(|| (name.len().abs_diff(wanted.len()), g.id, g))
            })
            .min_by_key(|(diff, id, _)| (*diff, *id))
            .map(|(_, _, g)| g)
    }

    /// Configured id, then lowest catalog id, then the safe id.
    fn default_department(
        &self,
        catalog: &CatalogSnapshot,
        defaults: &RoutingDefaults,
    ) -> (u64, Option<String>) {
        if let Some(id) = defaults.department_id {
            return (id, catalog.group(id).map(|g| g.name.clone()));
        }
        if let Some(group) = catalog.lowest_group() {
            return (self.adapter.resolve_department(group), Some(group.name.clone()));
        }
        (defaults.safe_department_id, None)
    }

    /// `None` when the name is empty or already in the catalog.
    fn suggest_group_name(&self, catalog: &CatalogSnapshot, predicted: &str) -> Option<String> {
        let name = collapse_whitespace(predicted);
        if name.is_empty() {
            return None;
        }
        let prefix = self.options.group_prefix.as_deref().unwrap_or("");
        let suggestion = format!("{prefix}{name}");
        if find_exact(catalog, &normalize_name(&suggestion)).is_some() {
            return None;
        }
        Some(suggestion)
    }
}

/// Whether `needle` appears as consecutive whole words inside `haystack`.
fn contains_word_run(haystack: &[&str], needle: &[&str]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|w| w == needle)
}

fn find_exact<'c>(catalog: &'c CatalogSnapshot, wanted: &str) -> Option<&'c CatalogGroup> {
    if wanted.is_empty() {
        return None;
    }
    catalog
        .groups
        .iter()
        .filter(|g| normalize_name(&g.name) == wanted)
        .min_by_key(|g| g.id)
}

/// One-shot reconcile with exact matching.
pub fn reconcile(
    adapter: Arc<dyn VendorAdapter>,
    prediction: &PredictedLabels,
    catalog: &CatalogSnapshot,
    defaults: &RoutingDefaults,
) -> RoutingDecision {
    Reconciler::strict(adapter).reconcile(prediction, catalog, defaults)
}
