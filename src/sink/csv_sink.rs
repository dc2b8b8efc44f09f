use crate::sink::{RecordSink, SinkError};
use serde::Serialize;
use std::fs::OpenOptions;
use std::marker::PhantomData;
use std::path::Path;

/// Append-only CSV sink
///
/// Rows are headerless; the column order is the record type's serde field
/// order. The file is opened in append mode so successive runs (and
/// successive batches within a run) extend the same table, which is what
/// makes an interrupted run resumable at batch granularity.
pub struct CsvSink<R> {
    writer: csv::Writer<std::fs::File>,
    _record: PhantomData<R>,
}

impl<R: Serialize> CsvSink<R> {
    /// Opens (creating if needed) the CSV file at `path` for appending
    pub fn open(path: &Path) -> Result<Self, SinkError> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);

        Ok(Self {
            writer,
            _record: PhantomData,
        })
    }
}

impl<R: Serialize> RecordSink<R> for CsvSink<R> {
    fn append(&mut self, records: &[R]) -> Result<(), SinkError> {
        for record in records {
            self.writer.serialize(record)?;
        }
        // One flush per batch: the append is the unit of persistence
        self.writer.flush()?;
        Ok(())
    }
}
