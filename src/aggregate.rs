//! Chunk-local pre-aggregation.
//!
//! Tallying is an associative, commutative reduction, so each chunk can
//! combine its own records before anything crosses the chunk boundary.
//! That bounds intermediate volume to one entry per distinct key per
//! chunk instead of one entry per input record. The cross-chunk merge in
//! [`crate::merge`] reuses the same `add` path at coarser granularity.

use indexmap::IndexMap;
use serde::Serialize;

use crate::errors::PipelineError;
use crate::record::{ActionKind, Record};
use crate::types::GroupKey;

/// Mapping of grouping key to running count, scoped to one chunk.
///
/// Owned by the chunk worker that produced it, then handed off read-only
/// to the merge. Key order in the map follows first insertion; no
/// ordering is guaranteed or relied on.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PartialCount {
    counts: IndexMap<GroupKey, u64>,
}

impl PartialCount {
    /// Create an empty tally.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` to `key`'s running count.
    ///
    /// Overflow aborts the job rather than wrapping; a wrapped running sum
    /// would silently corrupt the final totals.
    pub fn add(&mut self, key: impl Into<GroupKey>, weight: u64) -> Result<(), PipelineError> {
        let key = key.into();
        let current = self.counts.get(&key).copied().unwrap_or(0);
        let updated = current
            .checked_add(weight)
            .ok_or_else(|| PipelineError::CountOverflow { key: key.clone() })?;
        self.counts.insert(key, updated);
        Ok(())
    }

    /// Fold another tally into this one.
    ///
    /// This is the merge step; it goes through the same overflow-checked
    /// `add` path as per-record tallying.
    pub fn absorb(&mut self, other: PartialCount) -> Result<(), PipelineError> {
        for (key, count) in other.counts {
            self.add(key, count)?;
        }
        Ok(())
    }

    /// Current count for `key` (absent keys read as zero).
    pub fn get(&self, key: &str) -> u64 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of distinct keys tallied.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns `true` when no key has been tallied.
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterate over `(key, count)` entries.
    pub fn iter(&self) -> impl Iterator<Item = (&GroupKey, u64)> {
        self.counts.iter().map(|(key, count)| (key, *count))
    }

    /// Consume the tally, returning the underlying map.
    pub fn into_inner(self) -> IndexMap<GroupKey, u64> {
        self.counts
    }
}

/// Tally a sequence of grouping keys in arrival order, one unit each.
pub fn aggregate_keys<I>(keys: I) -> Result<PartialCount, PipelineError>
where
    I: IntoIterator<Item = GroupKey>,
{
    aggregate_weighted(keys.into_iter().map(|key| (key, 1)))
}

/// Tally `(key, weight)` pairs in arrival order.
///
/// The generalized form of [`aggregate_keys`] for aggregations that carry
/// a weight per record instead of counting units.
pub fn aggregate_weighted<I>(pairs: I) -> Result<PartialCount, PipelineError>
where
    I: IntoIterator<Item = (GroupKey, u64)>,
{
    let mut tally = PartialCount::new();
    for (key, weight) in pairs {
        tally.add(key, weight)?;
    }
    Ok(tally)
}

/// Grouping key for the click-count use case.
///
/// Returns the object id of `click` records; records with other action
/// kinds are valid but do not participate in this aggregation.
pub fn click_object_key(record: &Record) -> Option<GroupKey> {
    (record.action == ActionKind::Click).then(|| record.object_id.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn record(action: ActionKind, object_id: &str) -> Record {
        Record {
            subject_id: "u1".to_string(),
            object_id: object_id.to_string(),
            action,
            duration: 5,
            event_time: "t1".to_string(),
        }
    }

    #[test]
    fn aggregate_keys_counts_units_in_arrival_order() {
        let tally = aggregate_keys(
            ["p1", "p2", "p1", "p1"].map(str::to_string),
        )
        .unwrap();
        assert_eq!(tally.get("p1"), 3);
        assert_eq!(tally.get("p2"), 1);
        assert_eq!(tally.get("absent"), 0);
        assert_eq!(tally.len(), 2);
    }

    #[test]
    fn aggregate_weighted_sums_weights() {
        let tally = aggregate_weighted([
            ("p1".to_string(), 10),
            ("p2".to_string(), 1),
            ("p1".to_string(), 5),
        ])
        .unwrap();
        assert_eq!(tally.get("p1"), 15);
        assert_eq!(tally.get("p2"), 1);
    }

    #[test]
    fn add_overflow_is_fatal_and_names_the_key() {
        let mut tally = PartialCount::new();
        tally.add("hot", u64::MAX).unwrap();
        let err = tally.add("hot", 1).unwrap_err();
        match err {
            PipelineError::CountOverflow { key } => assert_eq!(key, "hot"),
            other => panic!("expected overflow, got {other:?}"),
        }
        // The failed add leaves the previous count untouched.
        assert_eq!(tally.get("hot"), u64::MAX);
    }

    #[test]
    fn click_key_extraction_filters_other_actions() {
        assert_eq!(
            click_object_key(&record(ActionKind::Click, "p7")),
            Some("p7".to_string())
        );
        for action in [ActionKind::Browse, ActionKind::Cart, ActionKind::Order] {
            assert_eq!(click_object_key(&record(action, "p7")), None);
        }
    }
}
