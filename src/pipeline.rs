//! In-process job driver.
//!
//! Mirrors the two batch jobs the pipeline exists for: a map-only clean
//! job (write surviving records) and a count job (per-chunk tally plus
//! global merge). One scoped worker thread runs per chunk; the only
//! shared mutable state between workers is the atomic [`CounterSet`].
//! `thread::scope` joins every worker before the merge runs, which
//! provides the barrier the merge requires.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::thread;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::debug;

use crate::aggregate::{click_object_key, PartialCount};
use crate::config::JobConfig;
use crate::constants::pipeline::{CLEAN_JOB_NAME, COUNT_JOB_NAME, OUTPUT_DELIMITER};
use crate::counters::CounterSet;
use crate::errors::PipelineError;
use crate::merge::merge_partials;
use crate::record::Outcome;
use crate::types::{CounterName, RawLine};
use crate::validate::validate;

/// Summary handed to the job-reporting collaborator after a run.
#[derive(Clone, Debug, Serialize)]
pub struct JobReport {
    /// Which job produced this report.
    pub job: &'static str,
    /// UTC time the job started.
    pub started_at: DateTime<Utc>,
    /// UTC time the job finished.
    pub finished_at: DateTime<Utc>,
    /// Final counter snapshot keyed by the contract names.
    pub counters: IndexMap<CounterName, u64>,
    /// Number of output lines written.
    pub lines_written: usize,
}

impl JobReport {
    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Split already-read input lines into fixed-size chunks.
///
/// Order is preserved within each chunk (required for counter attribution)
/// and across chunks (so clean-job output is deterministic). A zero chunk
/// size is treated as one.
pub fn split_chunks(lines: &[RawLine], lines_per_chunk: usize) -> Vec<&[RawLine]> {
    lines.chunks(lines_per_chunk.max(1)).collect()
}

/// One chunk's counting pass.
///
/// Validates each line sequentially in input order, extracts the click
/// grouping key from surviving records, and pre-aggregates locally so at
/// most one entry per distinct key leaves the chunk.
pub fn count_chunk(
    lines: &[RawLine],
    counters: &CounterSet,
) -> Result<PartialCount, PipelineError> {
    let mut tally = PartialCount::new();
    for line in lines {
        if let Outcome::Valid(record) = validate(line, counters) {
            if let Some(key) = click_object_key(&record) {
                tally.add(key, 1)?;
            }
        }
    }
    Ok(tally)
}

/// One chunk's cleaning pass.
///
/// Returns the canonical re-serialized lines of surviving records, input
/// order preserved; skipped and rejected lines are dropped.
pub fn clean_chunk(lines: &[RawLine], counters: &CounterSet) -> Vec<String> {
    lines
        .iter()
        .filter_map(|line| match validate(line, counters) {
            Outcome::Valid(record) => Some(record.to_line()),
            _ => None,
        })
        .collect()
}

/// Run the click-count job: clean, tally per chunk in parallel, merge, and
/// write one `key<TAB>count` line per distinct key.
pub fn run_count_job(config: &JobConfig) -> Result<JobReport, PipelineError> {
    let config = config.clone().validated()?;
    let started_at = Utc::now();
    let lines = read_lines(&config.input_path)?;
    let chunks = split_chunks(&lines, config.lines_per_chunk);
    debug!(
        input = %config.input_path.display(),
        lines = lines.len(),
        chunks = chunks.len(),
        "count job started"
    );

    let counters = CounterSet::new();
    let counters_ref = &counters;
    let results: Vec<Result<PartialCount, PipelineError>> = thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .iter()
            .enumerate()
            .map(|(idx, &chunk)| (idx, scope.spawn(move || count_chunk(chunk, counters_ref))))
            .collect();
        handles
            .into_iter()
            .map(|(idx, handle)| {
                handle
                    .join()
                    .unwrap_or(Err(PipelineError::ChunkFailed { chunk: idx }))
            })
            .collect()
    });

    // One partial per chunk per run. A scheduler redelivering a chunk must
    // replace that chunk's previous partial before the merge, never add a
    // second one; within a single run each chunk occupies exactly one slot.
    let mut partials = Vec::with_capacity(results.len());
    for result in results {
        partials.push(result?);
    }
    let totals = merge_partials(partials)?;

    let lines_written = write_output(
        &config.output_path,
        totals
            .iter()
            .map(|(key, count)| format!("{key}{OUTPUT_DELIMITER}{count}")),
    )?;
    debug!(
        distinct_keys = totals.len(),
        valid = counters.valid_records(),
        rejected = counters.rejected_total(),
        "count job finished"
    );
    Ok(JobReport {
        job: COUNT_JOB_NAME,
        started_at,
        finished_at: Utc::now(),
        counters: counters.snapshot(),
        lines_written,
    })
}

/// Run the map-only clean job: validate every line and write the canonical
/// form of each surviving record, in input order.
pub fn run_clean_job(config: &JobConfig) -> Result<JobReport, PipelineError> {
    let config = config.clone().validated()?;
    let started_at = Utc::now();
    let lines = read_lines(&config.input_path)?;
    let chunks = split_chunks(&lines, config.lines_per_chunk);
    debug!(
        input = %config.input_path.display(),
        lines = lines.len(),
        chunks = chunks.len(),
        "clean job started"
    );

    let counters = CounterSet::new();
    let counters_ref = &counters;
    let results: Vec<Result<Vec<String>, PipelineError>> = thread::scope(|scope| {
        let handles: Vec<_> = chunks
            .iter()
            .map(|&chunk| scope.spawn(move || clean_chunk(chunk, counters_ref)))
            .collect();
        handles
            .into_iter()
            .enumerate()
            .map(|(idx, handle)| {
                handle
                    .join()
                    .map_err(|_| PipelineError::ChunkFailed { chunk: idx })
            })
            .collect()
    });
    let mut cleaned = Vec::with_capacity(results.len());
    for result in results {
        cleaned.push(result?);
    }

    let lines_written = write_output(&config.output_path, cleaned.into_iter().flatten())?;
    debug!(
        lines_written,
        valid = counters.valid_records(),
        rejected = counters.rejected_total(),
        "clean job finished"
    );
    Ok(JobReport {
        job: CLEAN_JOB_NAME,
        started_at,
        finished_at: Utc::now(),
        counters: counters.snapshot(),
        lines_written,
    })
}

fn read_lines(path: &Path) -> Result<Vec<RawLine>, PipelineError> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Write one line per item, overwriting any pre-existing output file.
fn write_output(
    path: &Path,
    lines: impl Iterator<Item = String>,
) -> Result<usize, PipelineError> {
    let mut writer = BufWriter::new(File::create(path)?);
    let mut written = 0usize;
    for line in lines {
        writeln!(writer, "{line}")?;
        written += 1;
    }
    writer.flush()?;
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::RejectionReason;

    fn raw(lines: &[&str]) -> Vec<RawLine> {
        lines.iter().map(|line| line.to_string()).collect()
    }

    #[test]
    fn split_chunks_preserves_order_and_handles_remainders() {
        let lines = raw(&["a", "b", "c", "d", "e"]);
        let chunks = split_chunks(&lines, 2);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0], &lines[0..2]);
        assert_eq!(chunks[2], &lines[4..5]);

        assert!(split_chunks(&[], 2).is_empty());
        // Zero is clamped rather than panicking.
        assert_eq!(split_chunks(&lines, 0).len(), lines.len());
    }

    #[test]
    fn count_chunk_tallies_clicks_and_attributes_rejections() {
        let lines = raw(&[
            "u1,p1,click,10,t1",
            "u2,p1,click,5,t2",
            "#comment",
            "",
            "bad,line",
            "u3,p2,browse,9,t3",
        ]);
        let counters = CounterSet::new();
        let tally = count_chunk(&lines, &counters).unwrap();

        assert_eq!(tally.get("p1"), 2);
        assert_eq!(tally.get("p2"), 0);
        assert_eq!(tally.len(), 1);
        assert_eq!(counters.valid_records(), 3);
        assert_eq!(counters.rejected(RejectionReason::InvalidFieldCount), 1);
        assert_eq!(counters.rejected_total(), 1);
    }

    #[test]
    fn clean_chunk_keeps_canonical_lines_in_order() {
        let lines = raw(&[
            "# header",
            " u1 , p1 , click , 10 , t1 ",
            "u2,p2,hover,3,t2",
            "u3,p3,order,4,t3",
        ]);
        let counters = CounterSet::new();
        let cleaned = clean_chunk(&lines, &counters);
        assert_eq!(cleaned, vec!["u1,p1,click,10,t1", "u3,p3,order,4,t3"]);
        assert_eq!(counters.rejected(RejectionReason::InvalidActionKind), 1);
    }
}
