#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

/// Chunk-local pre-aggregation (the combiner) and key extraction.
pub mod aggregate;
/// Job invocation configuration.
pub mod config;
/// Centralized constants used across cleaning, counting, and the driver.
pub mod constants;
/// Shared per-job rejection/valid counters.
pub mod counters;
/// Cross-chunk merge of partial counts.
pub mod merge;
/// Post-job rejection statistics helpers.
pub mod metrics;
/// In-process job driver: chunking, parallel workers, output writing.
pub mod pipeline;
/// Record, action, and rejection types.
pub mod record;
/// Shared type aliases.
pub mod types;
/// Line cleaning rules and outcome classification.
pub mod validate;

mod errors;

pub use aggregate::{aggregate_keys, aggregate_weighted, click_object_key, PartialCount};
pub use config::JobConfig;
pub use counters::CounterSet;
pub use errors::PipelineError;
pub use merge::{merge_partials, FinalCount};
pub use metrics::{rejection_summary, ReasonShare, RejectionSummary};
pub use pipeline::{
    clean_chunk, count_chunk, run_clean_job, run_count_job, split_chunks, JobReport,
};
pub use record::{ActionKind, Outcome, Record, RejectionReason};
pub use types::{CounterName, EventTime, GroupKey, ObjectId, RawLine, SubjectId};
pub use validate::{classify, validate};
