//! Vendor-specific identifier mapping.
//!
//! The reconciler decides *which* group and level a ticket gets; adapters
//! only translate those decisions into the identifiers a vendor API expects.

use std::sync::Arc;

use normalize::collapse_whitespace;
use serde::{Deserialize, Serialize};

use crate::types::{CatalogGroup, CatalogSnapshot, PriorityCode, PriorityLevel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    Zammad,
    Zendesk,
}

impl Vendor {
    pub fn as_str(self) -> &'static str {
        match self {
            Vendor::Zammad => "zammad",
            Vendor::Zendesk => "zendesk",
        }
    }

    pub fn adapter(self) -> Arc<dyn VendorAdapter> {
        match self {
            Vendor::Zammad => Arc::new(ZammadAdapter),
            Vendor::Zendesk => Arc::new(ZendeskAdapter),
        }
    }
}

/// Narrow seam between the reconciliation state machine and a vendor.
pub trait VendorAdapter: Send + Sync {
    fn vendor(&self) -> Vendor;

    /// Vendor department id for a catalog group.
    fn resolve_department(&self, group: &CatalogGroup) -> u64 {
        group.id
    }

    /// Vendor priority code for `level`, consulting the catalog if the
    /// vendor addresses priorities by id.
    fn resolve_priority(&self, level: PriorityLevel, catalog: &CatalogSnapshot) -> PriorityCode;
}

/// Zammad: numeric `group_id` and `priority_id`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZammadAdapter;

impl ZammadAdapter {
    /// Stock Zammad priority ids.
    pub fn fixed_priority_id(level: PriorityLevel) -> u64 {
        match level {
            PriorityLevel::Low => 1,
            PriorityLevel::Normal => 2,
            PriorityLevel::High => 3,
        }
    }
}

impl VendorAdapter for ZammadAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Zammad
    }

    /// Prefers a catalog priority named after the level (`"high"` or the
    /// stock `"3 high"` form), lowest id first; otherwise the stock table.
    fn resolve_priority(&self, level: PriorityLevel, catalog: &CatalogSnapshot) -> PriorityCode {
        let wanted = level.as_str();
        let suffix = format!(" {wanted}");
        let from_catalog = catalog
            .priorities
            .iter()
            .filter(|p| {
                let name = collapse_whitespace(&p.name).to_lowercase();
                name == wanted || name.ends_with(&suffix)
            })
            .map(|p| p.id)
            .min();
        PriorityCode::Numeric(from_catalog.unwrap_or_else(|| Self::fixed_priority_id(level)))
    }
}

/// Zendesk: numeric `group_id`, string `priority`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZendeskAdapter;

impl VendorAdapter for ZendeskAdapter {
    fn vendor(&self) -> Vendor {
        Vendor::Zendesk
    }

    fn resolve_priority(&self, level: PriorityLevel, _catalog: &CatalogSnapshot) -> PriorityCode {
        PriorityCode::Named(level.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zammad_uses_stock_table_without_catalog() {
        let catalog = CatalogSnapshot::new();
        let a = ZammadAdapter;
        assert_eq!(a.resolve_priority(PriorityLevel::Low, &catalog), PriorityCode::Numeric(1));
        assert_eq!(a.resolve_priority(PriorityLevel::Normal, &catalog), PriorityCode::Numeric(2));
        assert_eq!(a.resolve_priority(PriorityLevel::High, &catalog), PriorityCode::Numeric(3));
    }

    #[test]
    fn zammad_prefers_catalog_names() {
        let catalog = CatalogSnapshot::new()
            .with_priority(11, "1 low")
            .with_priority(12, "2  Normal")
            .with_priority(13, "3 high");
        let a = ZammadAdapter;
        assert_eq!(a.resolve_priority(PriorityLevel::Normal, &catalog), PriorityCode::Numeric(12));
        assert_eq!(a.resolve_priority(PriorityLevel::High, &catalog), PriorityCode::Numeric(13));
    }

    #[test]
    fn zammad_catalog_suffix_needs_word_boundary() {
        // "highway" must not be read as "high"
        let catalog = CatalogSnapshot::new().with_priority(40, "highway");
        assert_eq!(
            ZammadAdapter.resolve_priority(PriorityLevel::High, &catalog),
            PriorityCode::Numeric(3)
        );
    }

    #[test]
    fn zendesk_uses_names() {
        let catalog = CatalogSnapshot::new().with_priority(1, "urgent");
        assert_eq!(
            ZendeskAdapter.resolve_priority(PriorityLevel::High, &catalog),
            PriorityCode::Named("high".into())
        );
    }

    #[test]
    fn vendor_builds_matching_adapter() {
        assert_eq!(Vendor::Zammad.adapter().vendor(), Vendor::Zammad);
        assert_eq!(Vendor::Zendesk.adapter().vendor(), Vendor::Zendesk);
    }
}
