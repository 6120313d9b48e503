//! # RouteIQ Routing (`routing`)
//!
//! Reconciles a predicted `(department, priority)` pair with the live
//! catalog of a ticketing backend and always produces a usable
//! [`RoutingDecision`].
//!
//! ## Decision flow
//!
//! 1. **Priority**: the predicted label is mapped through an alias table onto
//!    [`PriorityLevel`] (`low`, `normal`, `high`). Unknown labels use
//!    `defaults.priority` and set `priority_fallback`. The adapter turns the
//!    level into a vendor [`PriorityCode`].
//! 2. **Department**: an explicit group (if given and present) wins; then an
//!    exact match on the normalized name; then, when
//!    [`ReconcileOptions::relaxed`] is set, alias, prefix and substring
//!    matching.
//! 3. **Fallback**: configured default id, else the lowest catalog id, else
//!    `defaults.safe_department_id`.
//!
//! Unmatched departments and unknown priorities are never errors; they are
//! flagged on the decision instead.
//!
//! ## Vendors
//!
//! Vendor differences sit behind [`VendorAdapter`]:
//!
//! | vendor  | department  | priority                                  |
//! |---------|-------------|-------------------------------------------|
//! | Zammad  | `group_id`  | `priority_id` (`1`/`2`/`3` or catalog id) |
//! | Zendesk | `group_id`  | `"low"` / `"normal"` / `"high"`           |
//!
//! ## Example
//!
//! ```
//! use routing::{CatalogSnapshot, PredictedLabels, Reconciler, RoutingDefaults, Vendor};
//!
//! let reconciler = Reconciler::strict(Vendor::Zammad.adapter());
//! let catalog = CatalogSnapshot::new()
//!     .with_group(1, "Users")
//!     .with_group(7, "IT Support");
//!
//! let decision = reconciler.reconcile(
//!     &PredictedLabels::new("it support", "High"),
//!     &catalog,
//!     &RoutingDefaults::default(),
//! );
//! assert_eq!(decision.department_id, 7);
//! assert!(decision.matched);
//! assert_eq!(decision.priority_id.to_string(), "3");
//! ```

mod adapter;
mod engine;
mod types;

pub use crate::adapter::{Vendor, VendorAdapter, ZammadAdapter, ZendeskAdapter};
pub use crate::engine::{normalize_name, reconcile, Reconciler};
pub use crate::types::{
    CatalogGroup, CatalogPriority, CatalogSnapshot, DepartmentMatch, PredictedLabels,
    PriorityCode, PriorityLevel, ReconcileOptions, RoutingDecision, RoutingDefaults,
};
