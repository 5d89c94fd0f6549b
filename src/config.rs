use std::path::PathBuf;

use crate::constants::pipeline::DEFAULT_LINES_PER_CHUNK;
use crate::errors::PipelineError;

/// Resolved job invocation parameters.
///
/// The surrounding CLI/submission layer resolves its own argument quirks
/// and hands the driver this already-resolved form; [`JobConfig::validated`]
/// runs before any core code does.
#[derive(Clone, Debug)]
pub struct JobConfig {
    /// Input file containing one raw record per line.
    pub input_path: PathBuf,
    /// Output file for job results (overwritten when already present).
    pub output_path: PathBuf,
    /// Number of input lines handed to each chunk worker.
    pub lines_per_chunk: usize,
}

impl JobConfig {
    /// Create a config for `input_path` → `output_path` with default chunking.
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_path: output_path.into(),
            lines_per_chunk: DEFAULT_LINES_PER_CHUNK,
        }
    }

    /// Validate invariants: non-empty paths and a nonzero chunk size.
    pub fn validated(self) -> Result<Self, PipelineError> {
        if self.input_path.as_os_str().is_empty() {
            return Err(PipelineError::Configuration(
                "input path must not be empty".to_string(),
            ));
        }
        if self.output_path.as_os_str().is_empty() {
            return Err(PipelineError::Configuration(
                "output path must not be empty".to_string(),
            ));
        }
        if self.lines_per_chunk == 0 {
            return Err(PipelineError::Configuration(
                "lines_per_chunk must be at least 1".to_string(),
            ));
        }
        Ok(self)
    }
}
