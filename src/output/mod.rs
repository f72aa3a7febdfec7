//! Output module
//!
//! Converts record messages to Arrow and writes one Parquet file per stream.
//!
//! # Overview
//!
//! Planning Center records are JSON:API resource objects. Only the top
//! level becomes columns: scalars keep a typed column, while nested values
//! such as `attributes` and `relationships` are stored as JSON text.

mod schema;
mod sink;
mod writer;

pub use schema::{infer_schema, records_to_batch};
pub use sink::{ParquetSink, WrittenFile};
pub use writer::{write_batch_to_parquet, ParquetWriter, ParquetWriterConfig};
