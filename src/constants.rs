/// Constants describing the input record line format.
pub mod record {
    /// Exact number of comma-separated fields in a valid record line.
    pub const FIELD_COUNT: usize = 5;
    /// Field delimiter. Embedded delimiters cannot be escaped, so a field
    /// containing one is indistinguishable from a field boundary.
    pub const FIELD_DELIMITER: char = ',';
    /// Prefix marking a comment line to skip without counting.
    pub const COMMENT_PREFIX: char = '#';
}

/// Counter names surfaced to the job-reporting collaborator.
///
/// These names are part of the observable contract; renaming any of them
/// is a compatibility break for downstream report consumers.
pub mod counters {
    use crate::types::CounterName;

    /// Line had a field count other than five.
    pub const INVALID_FIELD_COUNT: CounterName = "InvalidFieldCount";
    /// Subject id field was empty or whitespace-only.
    pub const EMPTY_SUBJECT_ID: CounterName = "EmptySubjectId";
    /// Action field was not one of the closed action set.
    pub const INVALID_ACTION_KIND: CounterName = "InvalidActionKind";
    /// Duration field did not parse as a base-10 integer.
    pub const INVALID_DURATION: CounterName = "InvalidDuration";
    /// Duration field parsed but was negative.
    pub const NEGATIVE_DURATION: CounterName = "NegativeDuration";
    /// Line passed every cleaning rule.
    pub const VALID_RECORDS: CounterName = "ValidRecords";
}

/// Constants used by the in-process job driver.
pub mod pipeline {
    /// Delimiter between key and count in count-job output lines.
    pub const OUTPUT_DELIMITER: char = '\t';
    /// Default number of input lines handed to each chunk worker.
    pub const DEFAULT_LINES_PER_CHUNK: usize = 4096;
    /// Job label used in count-job reports.
    pub const COUNT_JOB_NAME: &str = "product_click_count";
    /// Job label used in clean-job reports.
    pub const CLEAN_JOB_NAME: &str = "log_clean";
}
