//! Per-asset partition health and tolerant multi-asset aggregation.
//!
//! Health data for the primary and upstream asset sets is fetched
//! independently and may resolve in any order. [`PartitionHealthSet`]
//! therefore accepts assets incrementally and answers queries from whatever
//! has arrived so far; callers never have to wait for the full set.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::partition::{PartitionKey, Selection};
use crate::span::{Span, assemble_into_spans};

/// Materialization status for one asset across its partition domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartitionHealth {
    /// The asset this health data describes.
    pub asset_key: String,
    /// The asset's partition domain, in catalog order.
    keys: Vec<PartitionKey>,
    /// Keys with at least one successful materialization.
    materialized: HashSet<PartitionKey>,
}

impl PartitionHealth {
    /// Creates health data for an asset.
    #[must_use]
    pub fn new<I, M, K, L>(asset_key: impl Into<String>, keys: I, materialized: M) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PartitionKey>,
        M: IntoIterator<Item = L>,
        L: Into<PartitionKey>,
    {
        Self {
            asset_key: asset_key.into(),
            keys: keys.into_iter().map(Into::into).collect(),
            materialized: materialized.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns the asset's partition domain in catalog order.
    #[must_use]
    pub fn keys(&self) -> &[PartitionKey] {
        &self.keys
    }

    /// Returns true if the key belongs to this asset's domain.
    #[must_use]
    pub fn contains(&self, key: &PartitionKey) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Returns true if the key has been materialized for this asset.
    #[must_use]
    pub fn is_materialized(&self, key: &PartitionKey) -> bool {
        self.materialized.contains(key)
    }
}

/// Health for several assets, built up as independent fetches resolve.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartitionHealthSet {
    assets: Vec<PartitionHealth>,
}

impl PartitionHealthSet {
    /// Creates an empty health set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records health data for one asset as its fetch resolves.
    pub fn insert(&mut self, health: PartitionHealth) {
        self.assets.push(health);
    }

    /// Returns the number of assets with resolved health data.
    #[must_use]
    pub fn len(&self) -> usize {
        self.assets.len()
    }

    /// Returns true if no asset health has resolved yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Returns the catalog keys: the first resolved asset's domain.
    ///
    /// Empty until at least one asset resolves.
    #[must_use]
    pub fn catalog_keys(&self) -> &[PartitionKey] {
        self.assets.first().map(PartitionHealth::keys).unwrap_or(&[])
    }

    /// Returns true if no tracked asset has materialized the key.
    ///
    /// Vacuously true with no resolved assets, matching the tolerant
    /// partial-data behavior of the selection presets.
    #[must_use]
    pub fn is_missing_everywhere(&self, key: &PartitionKey) -> bool {
        self.assets.iter().all(|asset| !asset.is_materialized(key))
    }

    /// Upstream-unavailability predicate.
    ///
    /// A key is upstream-unavailable if at least one upstream asset reports
    /// the key as present in its domain but not materialized. With no
    /// resolved upstream data, nothing is unavailable.
    #[must_use]
    pub fn is_unavailable(&self, key: &PartitionKey) -> bool {
        self.assets
            .iter()
            .any(|asset| asset.contains(key) && !asset.is_materialized(key))
    }
}

/// Assembles the spans of a selection that are upstream-unavailable.
///
/// Returns only the spans whose status is true under the unavailability
/// predicate, ready for warning display over the selection's keys.
#[must_use]
pub fn upstream_unavailable_spans(
    selection: &Selection,
    upstream: &PartitionHealthSet,
) -> Vec<Span> {
    assemble_into_spans(selection.keys(), |key| upstream.is_unavailable(key))
        .into_iter()
        .filter(|span| span.status)
        .collect()
}

/// Removal filter: the selection without its upstream-unavailable keys.
#[must_use]
pub fn reject_upstream_unavailable(
    selection: &Selection,
    upstream: &PartitionHealthSet,
) -> Selection {
    selection.reject(|key| upstream.is_unavailable(key))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::PartitionCatalog;
    use crate::span::string_for_span;

    fn catalog() -> PartitionCatalog {
        PartitionCatalog::new(["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"])
            .expect("catalog")
    }

    fn upstream_missing_middle() -> PartitionHealthSet {
        // Upstream asset has the full domain but only the first and last
        // keys materialized.
        let mut upstream = PartitionHealthSet::new();
        upstream.insert(PartitionHealth::new(
            "raw.events",
            ["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"],
            ["2024-01-01", "2024-01-04"],
        ));
        upstream
    }

    #[test]
    fn empty_health_set_reports_nothing_unavailable() {
        let upstream = PartitionHealthSet::new();
        assert!(!upstream.is_unavailable(&"2024-01-01".into()));
    }

    #[test]
    fn key_outside_upstream_domain_is_not_unavailable() {
        let mut upstream = PartitionHealthSet::new();
        upstream.insert(PartitionHealth::new(
            "raw.events",
            ["2024-01-01"],
            Vec::<PartitionKey>::new(),
        ));
        assert!(!upstream.is_unavailable(&"2024-02-01".into()));
    }

    #[test]
    fn unmaterialized_key_in_domain_is_unavailable() {
        let upstream = upstream_missing_middle();
        assert!(upstream.is_unavailable(&"2024-01-02".into()));
        assert!(!upstream.is_unavailable(&"2024-01-01".into()));
    }

    #[test]
    fn unavailable_spans_cover_only_true_runs() {
        let selection = Selection::all(&catalog());
        let upstream = upstream_missing_middle();

        let spans = upstream_unavailable_spans(&selection, &upstream);
        assert_eq!(spans.len(), 1);
        assert_eq!(
            string_for_span(&spans[0], selection.keys()),
            "2024-01-02 ... 2024-01-03"
        );
    }

    #[test]
    fn reject_removes_unavailable_keys_only() {
        let selection = Selection::all(&catalog());
        let upstream = upstream_missing_middle();

        let kept = reject_upstream_unavailable(&selection, &upstream);
        let keys: Vec<_> = kept.iter().map(PartitionKey::as_str).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-04"]);
    }

    #[test]
    fn catalog_keys_come_from_the_first_resolved_asset() {
        let mut health = PartitionHealthSet::new();
        assert!(health.catalog_keys().is_empty());

        health.insert(PartitionHealth::new(
            "analytics.daily",
            ["2024-01-01", "2024-01-02"],
            ["2024-01-01"],
        ));
        health.insert(PartitionHealth::new(
            "analytics.rollup",
            ["2024-01"],
            Vec::<PartitionKey>::new(),
        ));

        assert_eq!(health.catalog_keys().len(), 2);
    }
}
