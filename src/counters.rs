use std::sync::atomic::{AtomicU64, Ordering};

use indexmap::IndexMap;

use crate::constants::counters as names;
use crate::record::{Outcome, RejectionReason};
use crate::types::CounterName;

/// Shared per-job counters: one per rejection reason plus valid records.
///
/// Passed explicitly to validator invocations rather than living as a
/// process-wide singleton, so concurrent jobs (and tests) never interfere.
/// Increments are atomic and safe from any number of chunk workers;
/// [`CounterSet::snapshot`] is only well-defined once every validator for
/// the job has finished.
#[derive(Debug, Default)]
pub struct CounterSet {
    invalid_field_count: AtomicU64,
    empty_subject_id: AtomicU64,
    invalid_action_kind: AtomicU64,
    invalid_duration: AtomicU64,
    negative_duration: AtomicU64,
    valid_records: AtomicU64,
}

impl CounterSet {
    /// Create a fresh set with every counter at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the counter side effect of one validation outcome.
    ///
    /// `Skip` touches nothing; every other outcome increments exactly one
    /// counter.
    pub fn record_outcome(&self, outcome: &Outcome) {
        match outcome {
            Outcome::Valid(_) => self.increment_valid(),
            Outcome::Skip => {}
            Outcome::Rejected(reason) => self.increment(*reason),
        }
    }

    /// Atomically increment the counter for `reason`.
    pub fn increment(&self, reason: RejectionReason) {
        self.cell(reason).fetch_add(1, Ordering::Relaxed);
    }

    /// Atomically increment the valid-records counter.
    pub fn increment_valid(&self) {
        self.valid_records.fetch_add(1, Ordering::Relaxed);
    }

    /// Current valid-record count.
    pub fn valid_records(&self) -> u64 {
        self.valid_records.load(Ordering::Relaxed)
    }

    /// Current count for one rejection reason.
    pub fn rejected(&self, reason: RejectionReason) -> u64 {
        self.cell(reason).load(Ordering::Relaxed)
    }

    /// Sum of all rejection counters.
    pub fn rejected_total(&self) -> u64 {
        RejectionReason::ALL
            .iter()
            .map(|reason| self.rejected(*reason))
            .sum()
    }

    /// Read every counter, keyed by the contract names in a fixed order.
    ///
    /// Call after all validators have finished; no consistency guarantee is
    /// made for snapshots taken mid-run.
    pub fn snapshot(&self) -> IndexMap<CounterName, u64> {
        let mut snapshot = IndexMap::with_capacity(RejectionReason::ALL.len() + 1);
        for reason in RejectionReason::ALL {
            snapshot.insert(reason.counter_name(), self.rejected(reason));
        }
        snapshot.insert(names::VALID_RECORDS, self.valid_records());
        snapshot
    }

    fn cell(&self, reason: RejectionReason) -> &AtomicU64 {
        match reason {
            RejectionReason::InvalidFieldCount => &self.invalid_field_count,
            RejectionReason::EmptySubjectId => &self.empty_subject_id,
            RejectionReason::InvalidActionKind => &self.invalid_action_kind,
            RejectionReason::InvalidDuration => &self.invalid_duration,
            RejectionReason::NegativeDuration => &self.negative_duration,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use super::*;

    #[test]
    fn snapshot_uses_contract_names_in_fixed_order() {
        let counters = CounterSet::new();
        counters.increment(RejectionReason::InvalidDuration);
        counters.increment_valid();

        let snapshot = counters.snapshot();
        let keys: Vec<_> = snapshot.keys().copied().collect();
        assert_eq!(
            keys,
            vec![
                "InvalidFieldCount",
                "EmptySubjectId",
                "InvalidActionKind",
                "InvalidDuration",
                "NegativeDuration",
                "ValidRecords",
            ]
        );
        assert_eq!(snapshot["InvalidDuration"], 1);
        assert_eq!(snapshot["ValidRecords"], 1);
        assert_eq!(snapshot["InvalidFieldCount"], 0);
    }

    #[test]
    fn skip_outcomes_touch_no_counter() {
        let counters = CounterSet::new();
        counters.record_outcome(&Outcome::Skip);
        assert!(counters.snapshot().values().all(|count| *count == 0));
    }

    #[test]
    fn concurrent_increments_lose_no_updates() {
        let counters = Arc::new(CounterSet::new());
        let threads = 8;
        let per_thread = 10_000u64;

        let mut handles = Vec::with_capacity(threads);
        for _ in 0..threads {
            let counters = Arc::clone(&counters);
            handles.push(thread::spawn(move || {
                for idx in 0..per_thread {
                    if idx % 2 == 0 {
                        counters.increment_valid();
                    } else {
                        counters.increment(RejectionReason::InvalidFieldCount);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        let expected = threads as u64 * per_thread / 2;
        assert_eq!(counters.valid_records(), expected);
        assert_eq!(counters.rejected(RejectionReason::InvalidFieldCount), expected);
        assert_eq!(counters.rejected_total(), expected);
    }
}
