use serde::Serialize;

use crate::counters::CounterSet;
use crate::record::RejectionReason;

/// Aggregate rejection statistics for one finished job.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RejectionSummary {
    /// Lines attributed to a counter (valid + rejected; skips excluded).
    pub considered: u64,
    /// Lines that passed every cleaning rule.
    pub valid: u64,
    /// Lines rejected by any rule.
    pub rejected: u64,
    /// Rejected share of considered lines (zero when nothing was considered).
    pub reject_rate: f64,
    /// Per-reason counts, largest first.
    pub per_reason: Vec<ReasonShare>,
}

/// One rejection reason's share of all rejected lines.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ReasonShare {
    /// The rejection reason.
    pub reason: RejectionReason,
    /// Lines rejected for this reason.
    pub count: u64,
    /// Fraction of all rejected lines (zero when nothing was rejected).
    pub share: f64,
}

/// Compute rejection statistics from a finished counter set.
///
/// Only meaningful after every validator for the job has finished, same as
/// [`CounterSet::snapshot`].
pub fn rejection_summary(counters: &CounterSet) -> RejectionSummary {
    let valid = counters.valid_records();
    let rejected = counters.rejected_total();
    let considered = valid + rejected;
    let reject_rate = if considered == 0 {
        0.0
    } else {
        rejected as f64 / considered as f64
    };
    let mut per_reason: Vec<ReasonShare> = RejectionReason::ALL
        .iter()
        .map(|reason| {
            let count = counters.rejected(*reason);
            ReasonShare {
                reason: *reason,
                count,
                share: if rejected == 0 {
                    0.0
                } else {
                    count as f64 / rejected as f64
                },
            }
        })
        .collect();
    per_reason.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.reason.counter_name().cmp(b.reason.counter_name()))
    });
    RejectionSummary {
        considered,
        valid,
        rejected,
        reject_rate,
        per_reason,
    }
}
