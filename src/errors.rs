use std::io;

use thiserror::Error;

use crate::types::GroupKey;

/// Error type for configuration, driver IO, and aggregation failures.
///
/// Per-record rejections are not errors; they are typed [`crate::Outcome`]
/// values counted by the shared [`crate::CounterSet`].
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("count overflow while tallying key '{key}'")]
    CountOverflow { key: GroupKey },
    #[error("chunk {chunk} worker terminated abnormally")]
    ChunkFailed { chunk: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("configuration error: {0}")]
    Configuration(String),
}
