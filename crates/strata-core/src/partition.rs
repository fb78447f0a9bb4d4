//! Partition catalog and selection bookkeeping.
//!
//! A [`PartitionCatalog`] is the canonical ordered universe of partition keys
//! for an asset job, fetched from an external source. Keys are opaque strings;
//! their ordering is the catalog's positional order and is never derived from
//! the key text itself.
//!
//! A [`Selection`] is a subset of the catalog held in catalog order, so that
//! span assembly over the selection stays coherent with range display.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::health::PartitionHealthSet;

/// An opaque partition key identifier.
///
/// Equality and hashing are by key text; ordering is intentionally not
/// implemented because catalog position is the only authoritative order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PartitionKey(String);

impl PartitionKey {
    /// Creates a partition key from a string.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Returns the key text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartitionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for PartitionKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl From<String> for PartitionKey {
    fn from(key: String) -> Self {
        Self(key)
    }
}

/// The canonical ordered sequence of partition keys for a job.
///
/// Defines the universe and ordering for selections and span assembly.
/// Keys are unique; construction rejects duplicates.
#[derive(Debug, Clone, Default)]
pub struct PartitionCatalog {
    keys: Vec<PartitionKey>,
    positions: HashMap<PartitionKey, usize>,
}

impl PartitionCatalog {
    /// Builds a catalog from an ordered key sequence.
    ///
    /// # Errors
    /// Returns an error if the sequence contains a duplicate key.
    pub fn new<I, K>(keys: I) -> Result<Self>
    where
        I: IntoIterator<Item = K>,
        K: Into<PartitionKey>,
    {
        let keys: Vec<PartitionKey> = keys.into_iter().map(Into::into).collect();
        let mut positions = HashMap::with_capacity(keys.len());
        for (position, key) in keys.iter().enumerate() {
            if positions.insert(key.clone(), position).is_some() {
                return Err(Error::DuplicatePartitionKey {
                    key: key.to_string(),
                });
            }
        }
        Ok(Self { keys, positions })
    }

    /// Returns the keys in catalog order.
    #[must_use]
    pub fn keys(&self) -> &[PartitionKey] {
        &self.keys
    }

    /// Returns the number of keys in the catalog.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if the catalog has no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if the key belongs to the catalog.
    #[must_use]
    pub fn contains(&self, key: &PartitionKey) -> bool {
        self.positions.contains_key(key)
    }

    /// Returns the catalog position of a key, if present.
    #[must_use]
    pub fn position_of(&self, key: &PartitionKey) -> Option<usize> {
        self.positions.get(key).copied()
    }

    /// Returns the most recent key (the last in catalog order).
    #[must_use]
    pub fn most_recent(&self) -> Option<&PartitionKey> {
        self.keys.last()
    }
}

/// A subset of the catalog, held in catalog order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Selection {
    keys: Vec<PartitionKey>,
}

impl Selection {
    /// Creates an empty selection.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds a selection from arbitrary keys.
    ///
    /// Keys not present in the catalog are dropped; the result is
    /// de-duplicated and re-ordered into catalog order regardless of the
    /// input order.
    #[must_use]
    pub fn from_keys<I, K>(catalog: &PartitionCatalog, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<PartitionKey>,
    {
        let mut positions: Vec<usize> = keys
            .into_iter()
            .filter_map(|key| catalog.position_of(&key.into()))
            .collect();
        positions.sort_unstable();
        positions.dedup();

        let keys = positions
            .into_iter()
            .filter_map(|position| catalog.keys().get(position).cloned())
            .collect();
        Self { keys }
    }

    /// Selects only the most recent catalog key.
    ///
    /// Empty catalog yields an empty selection.
    #[must_use]
    pub fn most_recent(catalog: &PartitionCatalog) -> Self {
        Self {
            keys: catalog.most_recent().cloned().into_iter().collect(),
        }
    }

    /// Selects every catalog key.
    #[must_use]
    pub fn all(catalog: &PartitionCatalog) -> Self {
        Self {
            keys: catalog.keys().to_vec(),
        }
    }

    /// Selects the keys that no tracked asset has materialized.
    #[must_use]
    pub fn missing(catalog: &PartitionCatalog, health: &PartitionHealthSet) -> Self {
        Self {
            keys: catalog
                .keys()
                .iter()
                .filter(|key| health.is_missing_everywhere(key))
                .cloned()
                .collect(),
        }
    }

    /// Returns the selected keys in catalog order.
    #[must_use]
    pub fn keys(&self) -> &[PartitionKey] {
        &self.keys
    }

    /// Returns the number of selected keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if nothing is selected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns true if the key is selected.
    #[must_use]
    pub fn contains(&self, key: &PartitionKey) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Removal filter: keeps the keys for which the predicate is false.
    #[must_use]
    pub fn reject<P>(&self, predicate: P) -> Self
    where
        P: Fn(&PartitionKey) -> bool,
    {
        Self {
            keys: self
                .keys
                .iter()
                .filter(|key| !predicate(key))
                .cloned()
                .collect(),
        }
    }

    /// Returns an iterator over the selected keys.
    pub fn iter(&self) -> impl Iterator<Item = &PartitionKey> {
        self.keys.iter()
    }
}

impl<'a> IntoIterator for &'a Selection {
    type Item = &'a PartitionKey;
    type IntoIter = std::slice::Iter<'a, PartitionKey>;

    fn into_iter(self) -> Self::IntoIter {
        self.keys.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::PartitionHealth;

    fn daily_catalog() -> PartitionCatalog {
        PartitionCatalog::new(["2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04"])
            .expect("catalog")
    }

    #[test]
    fn catalog_rejects_duplicate_keys() {
        let result = PartitionCatalog::new(["a", "b", "a"]);
        assert!(matches!(
            result,
            Err(Error::DuplicatePartitionKey { key }) if key == "a"
        ));
    }

    #[test]
    fn catalog_order_is_positional_not_lexicographic() {
        let catalog = PartitionCatalog::new(["z", "a", "m"]).expect("catalog");
        assert_eq!(catalog.position_of(&"z".into()), Some(0));
        assert_eq!(catalog.position_of(&"a".into()), Some(1));
        assert_eq!(catalog.most_recent(), Some(&PartitionKey::new("m")));
    }

    #[test]
    fn selection_reorders_input_into_catalog_order() {
        let catalog = daily_catalog();
        let selection =
            Selection::from_keys(&catalog, ["2024-01-03", "2024-01-01", "2024-01-03"]);

        let keys: Vec<_> = selection.iter().map(PartitionKey::as_str).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-03"]);
    }

    #[test]
    fn selection_drops_keys_outside_the_catalog() {
        let catalog = daily_catalog();
        let selection = Selection::from_keys(&catalog, ["2024-01-02", "2024-02-30"]);
        assert_eq!(selection.len(), 1);
    }

    #[test]
    fn most_recent_selects_the_last_catalog_key() {
        let catalog = daily_catalog();
        let selection = Selection::most_recent(&catalog);
        let keys: Vec<_> = selection.iter().map(PartitionKey::as_str).collect();
        assert_eq!(keys, vec!["2024-01-04"]);
    }

    #[test]
    fn most_recent_on_empty_catalog_is_empty() {
        let catalog = PartitionCatalog::default();
        assert!(Selection::most_recent(&catalog).is_empty());
    }

    #[test]
    fn all_selects_every_key() {
        let catalog = daily_catalog();
        assert_eq!(Selection::all(&catalog).len(), 4);
    }

    #[test]
    fn missing_selects_keys_no_asset_has_materialized() {
        let catalog = daily_catalog();
        let mut health = PartitionHealthSet::new();
        health.insert(PartitionHealth::new(
            "analytics.daily",
            catalog.keys().to_vec(),
            ["2024-01-01", "2024-01-03"],
        ));
        health.insert(PartitionHealth::new(
            "analytics.rollup",
            catalog.keys().to_vec(),
            ["2024-01-02"],
        ));

        let selection = Selection::missing(&catalog, &health);
        let keys: Vec<_> = selection.iter().map(PartitionKey::as_str).collect();
        assert_eq!(keys, vec!["2024-01-04"]);
    }

    #[test]
    fn reject_keeps_keys_failing_the_predicate() {
        let catalog = daily_catalog();
        let selection = Selection::all(&catalog);
        let rejected = selection.reject(|key| key.as_str() == "2024-01-02");

        let keys: Vec<_> = rejected.iter().map(PartitionKey::as_str).collect();
        assert_eq!(keys, vec!["2024-01-01", "2024-01-03", "2024-01-04"]);
    }
}
