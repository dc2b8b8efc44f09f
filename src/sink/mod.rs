//! Durable output
//!
//! The sink is append-only and batch-granular: the batch scheduler hands
//! it one concatenated record list per completed batch, and each append is
//! the unit of persistence. The dump store is the side channel for
//! degraded units' raw documents.

mod csv_sink;
mod dump;
mod memory;
mod traits;

pub use csv_sink::CsvSink;
pub use dump::DumpStore;
pub use memory::MemorySink;
pub use traits::{RecordSink, SinkError};
