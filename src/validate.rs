//! Line cleaning rules.
//!
//! Each rule attributes at most one rejection reason per line, and the
//! rules run in a fixed order (field count, subject id, action kind,
//! duration parse, duration sign). The order is observable through the
//! counter a multiply-broken line lands in, so it is part of the contract.

use crate::constants::record::{COMMENT_PREFIX, FIELD_COUNT, FIELD_DELIMITER};
use crate::counters::CounterSet;
use crate::record::{ActionKind, Outcome, Record, RejectionReason};

/// Classify one raw line and record the outcome in `counters`.
///
/// Stateless apart from the injected counters; calls for different lines
/// are independent and may run from any number of chunk workers. Within a
/// chunk, callers invoke this sequentially in input order.
pub fn validate(line: &str, counters: &CounterSet) -> Outcome {
    let outcome = classify(line);
    counters.record_outcome(&outcome);
    outcome
}

/// Pure classification of one raw line, without the counter side effect.
pub fn classify(line: &str) -> Outcome {
    let line = line.trim();
    if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
        return Outcome::Skip;
    }

    let mut fields: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    // Trailing empty fields do not count toward the field total, so
    // `a,b,c,1,` carries four fields. Interior empties are preserved.
    while fields.last().is_some_and(|field| field.is_empty()) {
        fields.pop();
    }
    if fields.len() != FIELD_COUNT {
        return Outcome::Rejected(RejectionReason::InvalidFieldCount);
    }

    let subject_id = fields[0].trim();
    if subject_id.is_empty() {
        return Outcome::Rejected(RejectionReason::EmptySubjectId);
    }

    let Some(action) = ActionKind::parse(fields[2].trim()) else {
        return Outcome::Rejected(RejectionReason::InvalidActionKind);
    };

    // A parse failure (empty, signs-only, non-numeric, overflow) and a
    // successfully parsed negative are distinct reasons.
    let duration = match fields[3].trim().parse::<i64>() {
        Ok(value) if value < 0 => {
            return Outcome::Rejected(RejectionReason::NegativeDuration);
        }
        Ok(value) => value as u64,
        Err(_) => return Outcome::Rejected(RejectionReason::InvalidDuration),
    };

    Outcome::Valid(Record {
        subject_id: subject_id.to_string(),
        object_id: fields[1].trim().to_string(),
        action,
        duration,
        event_time: fields[4].trim().to_string(),
    })
}
