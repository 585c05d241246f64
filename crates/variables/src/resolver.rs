//! Band resolution against a live dataset snapshot.
//!
//! Curated keys don't always match the dataset's band naming: monthly
//! aggregates append `_mean` or `_sum`, and some snapshots drop the suffix.
//! For each key the candidates `[key, base, base_mean, base_sum]` are tried
//! in order, where `base` is the key with one trailing `_mean`/`_sum` removed.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::{Deserialize, Serialize};

const SUFFIXES: [&str; 2] = ["_mean", "_sum"];

/// Outcome of resolving a set of curated keys.
///
/// Every curated key lands in exactly one of `resolved` or `missing`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Curated key to the band present in the dataset
    pub resolved: BTreeMap<String, String>,
    /// Curated keys with no matching band, sorted
    pub missing: Vec<String>,
}

impl Resolution {
    pub fn band_for(&self, key: &str) -> Option<&str> {
        self.resolved.get(key).map(String::as_str)
    }

    pub fn is_resolved(&self, key: &str) -> bool {
        self.resolved.contains_key(key)
    }

    /// True when `keys` are split between resolved and missing with no
    /// overlap and no omission.
    pub fn is_partition_of<I, S>(&self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let expected: BTreeSet<String> = keys.into_iter().map(|k| k.as_ref().to_string()).collect();
        let missing: BTreeSet<&String> = self.missing.iter().collect();

        let overlap = self.resolved.keys().any(|k| missing.contains(k));
        let covered: BTreeSet<String> = self
            .resolved
            .keys()
            .chain(self.missing.iter())
            .cloned()
            .collect();

        !overlap && covered == expected && missing.len() == self.missing.len()
    }
}

/// Strip at most one trailing aggregation suffix.
pub fn base_name(key: &str) -> &str {
    SUFFIXES
        .iter()
        .find_map(|suffix| key.strip_suffix(suffix))
        .unwrap_or(key)
}

/// Ordered, de-duplicated candidate band names for a curated key.
pub fn candidate_bands(key: &str) -> Vec<String> {
    let base = base_name(key);
    let mut candidates: Vec<String> = Vec::with_capacity(4);
    for candidate in [
        key.to_string(),
        base.to_string(),
        format!("{}_mean", base),
        format!("{}_sum", base),
    ] {
        if !candidates.contains(&candidate) {
            candidates.push(candidate);
        }
    }
    candidates
}

/// Resolve curated keys against the bands a dataset exposes.
pub fn resolve<K, A>(curated: K, available: A) -> Resolution
where
    K: IntoIterator,
    K::Item: AsRef<str>,
    A: IntoIterator,
    A::Item: AsRef<str>,
{
    let available: HashSet<String> = available
        .into_iter()
        .map(|b| b.as_ref().to_string())
        .collect();

    let mut resolution = Resolution::default();
    let mut missing = BTreeSet::new();

    for key in curated {
        let key = key.as_ref();
        if resolution.resolved.contains_key(key) || missing.contains(key) {
            continue;
        }

        match candidate_bands(key)
            .into_iter()
            .find(|candidate| available.contains(candidate))
        {
            Some(band) => {
                resolution.resolved.insert(key.to_string(), band);
            }
            None => {
                missing.insert(key.to_string());
            }
        }
    }

    if !missing.is_empty() {
        tracing::debug!(missing = ?missing, "Curated variables without a matching band");
    }
    resolution.missing = missing.into_iter().collect();
    resolution
}
