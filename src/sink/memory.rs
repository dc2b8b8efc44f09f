use crate::sink::{RecordSink, SinkError};

/// In-memory sink that records each append as a separate batch
///
/// Used by tests to observe batch boundaries and ordering; nothing is
/// persisted.
#[derive(Debug, Default)]
pub struct MemorySink<R> {
    batches: Vec<Vec<R>>,
}

impl<R> MemorySink<R> {
    pub fn new() -> Self {
        Self {
            batches: Vec::new(),
        }
    }

    /// One entry per append call, in call order
    pub fn batches(&self) -> &[Vec<R>] {
        &self.batches
    }

    /// All records across every append, flattened in append order
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.batches.iter().flatten()
    }
}

impl<R: Clone> RecordSink<R> for MemorySink<R> {
    fn append(&mut self, records: &[R]) -> Result<(), SinkError> {
        self.batches.push(records.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batches_recorded_separately() {
        let mut sink = MemorySink::new();
        sink.append(&[1, 2]).unwrap();
        sink.append(&[3]).unwrap();

        assert_eq!(sink.batches().len(), 2);
        assert_eq!(sink.batches()[0], vec![1, 2]);
        let all: Vec<_> = sink.records().copied().collect();
        assert_eq!(all, vec![1, 2, 3]);
    }
}
