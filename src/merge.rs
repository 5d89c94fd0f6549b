//! Cross-chunk merge of partial counts.
//!
//! Chunk completion order is not guaranteed by the external scheduler, so
//! the merge must produce identical totals regardless of the order the
//! partials arrive in, and regardless of any hierarchical grouping (merging
//! pairs of partials, then merging the results). Both properties fall out
//! of reusing the tally's own `add` path, which is an associative and
//! commutative integer sum per key.

use crate::aggregate::PartialCount;
use crate::errors::PipelineError;

/// Final cross-chunk totals.
///
/// Same associative structure as a chunk-local tally; the combiner and the
/// reducer are one code path applied at different granularities.
pub type FinalCount = PartialCount;

/// Merge partial counts into final totals.
///
/// Each key's final count is the sum of that key's count across every
/// supplied partial, with absent keys reading as zero. Overflow of a
/// running total is fatal ([`PipelineError::CountOverflow`]) — a silent
/// wrap would be indistinguishable from a correct result.
///
/// Callers redelivering a chunk must replace that chunk's previous partial
/// rather than supplying both; the merge itself sums whatever it is given.
pub fn merge_partials<I>(partials: I) -> Result<FinalCount, PipelineError>
where
    I: IntoIterator<Item = PartialCount>,
{
    let mut totals = FinalCount::new();
    for partial in partials {
        totals.absorb(partial)?;
    }
    Ok(totals)
}
