use thiserror::Error;

/// Errors that can occur while persisting records
#[derive(Debug, Error)]
pub enum SinkError {
    #[error("Failed to write output: {0}")]
    Write(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Append-only destination for extracted records
///
/// One call per completed batch; a call either persists the full slice or
/// fails without the caller assuming anything was written, in which case
/// the run aborts rather than continuing past a half-persisted batch.
pub trait RecordSink<R> {
    /// Appends a batch's worth of records
    fn append(&mut self, records: &[R]) -> Result<(), SinkError>;
}
