use serde::{Deserialize, Serialize};

use crate::constants::counters;
use crate::constants::record::FIELD_DELIMITER;
use crate::types::{CounterName, EventTime, ObjectId, SubjectId};

/// Closed set of user actions a record may carry.
///
/// Parsing is case-sensitive and exact; anything else rejects the line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionKind {
    /// A product click.
    Click,
    /// A listing/browse view.
    Browse,
    /// An add-to-cart.
    Cart,
    /// A placed order.
    Order,
}

impl ActionKind {
    /// Parse the on-wire action token.
    pub fn parse(text: &str) -> Option<Self> {
        match text {
            "click" => Some(Self::Click),
            "browse" => Some(Self::Browse),
            "cart" => Some(Self::Cart),
            "order" => Some(Self::Order),
            _ => None,
        }
    }

    /// The on-wire token for this action.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Browse => "browse",
            Self::Cart => "cart",
            Self::Order => "order",
        }
    }
}

/// Validated, typed form of one input line.
///
/// A `Record` exists only if all five fields were present and every
/// cleaning rule passed. It is consumed by key extraction during the
/// counting pass and not retained afterwards.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// User identifier (never empty).
    pub subject_id: SubjectId,
    /// Object/product identifier; carried through unvalidated.
    pub object_id: ObjectId,
    /// Action performed by the user.
    pub action: ActionKind,
    /// Dwell time; non-negative by construction.
    pub duration: u64,
    /// Opaque event timestamp text; presence-checked, format is not.
    pub event_time: EventTime,
}

impl Record {
    /// Re-serialize the canonical comma-separated line for clean-job output.
    pub fn to_line(&self) -> String {
        let delim = FIELD_DELIMITER;
        format!(
            "{}{delim}{}{delim}{}{delim}{}{delim}{}",
            self.subject_id,
            self.object_id,
            self.action.as_str(),
            self.duration,
            self.event_time
        )
    }
}

/// Why a line was rejected by the cleaner.
///
/// Exactly one reason is attributed per rejected line, in rule order:
/// field count, subject id, action kind, duration parse, duration sign.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RejectionReason {
    /// Field count was not exactly five.
    InvalidFieldCount,
    /// Subject id field was empty or whitespace-only.
    EmptySubjectId,
    /// Action field was not in the closed action set.
    InvalidActionKind,
    /// Duration field did not parse as a base-10 integer.
    InvalidDuration,
    /// Duration parsed but was negative (distinct from a parse failure).
    NegativeDuration,
}

impl RejectionReason {
    /// All reasons, in counter-snapshot order.
    pub const ALL: [RejectionReason; 5] = [
        RejectionReason::InvalidFieldCount,
        RejectionReason::EmptySubjectId,
        RejectionReason::InvalidActionKind,
        RejectionReason::InvalidDuration,
        RejectionReason::NegativeDuration,
    ];

    /// Counter name surfaced for this reason (observable contract).
    pub fn counter_name(&self) -> CounterName {
        match self {
            Self::InvalidFieldCount => counters::INVALID_FIELD_COUNT,
            Self::EmptySubjectId => counters::EMPTY_SUBJECT_ID,
            Self::InvalidActionKind => counters::INVALID_ACTION_KIND,
            Self::InvalidDuration => counters::INVALID_DURATION,
            Self::NegativeDuration => counters::NEGATIVE_DURATION,
        }
    }
}

/// Classification of one raw input line.
///
/// Malformed input never panics or errors; every failure mode is one of
/// these typed outcomes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Line passed every rule.
    Valid(Record),
    /// Comment or blank line; ignored without touching any counter.
    Skip,
    /// Line failed exactly one rule.
    Rejected(RejectionReason),
}

impl Outcome {
    /// The validated record, if this outcome is `Valid`.
    pub fn record(&self) -> Option<&Record> {
        match self {
            Self::Valid(record) => Some(record),
            _ => None,
        }
    }

    /// Consume the outcome, returning the record for `Valid` lines.
    pub fn into_record(self) -> Option<Record> {
        match self {
            Self::Valid(record) => Some(record),
            _ => None,
        }
    }
}
