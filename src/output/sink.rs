//! Per-stream Parquet sink
//!
//! Records are buffered per stream and written out one row group at a time,
//! so a stream never holds more than `row_group_size` records in memory. The
//! first row group of a stream fixes its file schema.

use super::schema::{infer_schema, infer_type, records_to_batch};
use super::writer::{ParquetWriter, ParquetWriterConfig};
use crate::engine::Message;
use crate::error::{Error, Result};
use crate::types::Record;
use arrow::datatypes::{DataType, Schema};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// A Parquet file produced by [`ParquetSink::finish`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    /// Stream the file holds
    pub stream: String,
    /// File location
    pub path: PathBuf,
    /// Rows written
    pub rows: usize,
}

/// Open output of one stream
struct StreamOutput {
    pending: Vec<Record>,
    file: Option<(Schema, ParquetWriter)>,
}

impl std::fmt::Debug for StreamOutput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamOutput")
            .field("pending", &self.pending.len())
            .field("open", &self.file.is_some())
            .finish()
    }
}

/// Streams record messages into `<dir>/<stream>.parquet`
#[derive(Debug)]
pub struct ParquetSink {
    dir: PathBuf,
    config: ParquetWriterConfig,
    outputs: BTreeMap<String, StreamOutput>,
}

impl ParquetSink {
    /// Create a sink writing into `dir`, created if missing
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        std::fs::create_dir_all(&dir).map_err(|e| {
            Error::output(format!("Failed to create {}: {e}", dir.display()))
        })?;
        Ok(Self {
            dir,
            config: ParquetWriterConfig::default(),
            outputs: BTreeMap::new(),
        })
    }

    /// Override the writer configuration
    #[must_use]
    pub fn with_config(mut self, config: ParquetWriterConfig) -> Self {
        self.config = config;
        self
    }

    /// Take a message. Returns whether it was a record.
    ///
    /// A full row group is written as soon as it is complete.
    pub fn push(&mut self, message: &Message) -> Result<bool> {
        let Message::Record { stream, data, .. } = message else {
            return Ok(false);
        };

        let output = self
            .outputs
            .entry(stream.clone())
            .or_insert_with(|| StreamOutput {
                pending: Vec::new(),
                file: None,
            });
        output.pending.push(data.clone());

        if output.pending.len() >= self.config.row_group_size() {
            let path = self.dir.join(format!("{stream}.parquet"));
            flush(stream, &path, output, &self.config)?;
        }
        Ok(true)
    }

    /// Records held in memory for a stream
    pub fn buffered(&self, stream: &str) -> usize {
        self.outputs.get(stream).map_or(0, |o| o.pending.len())
    }

    /// Write what is left and close every file
    pub fn finish(self) -> Result<Vec<WrittenFile>> {
        let mut written = Vec::new();
        for (stream, mut output) in self.outputs {
            let path = self.dir.join(format!("{stream}.parquet"));
            flush(&stream, &path, &mut output, &self.config)?;

            let Some((_, writer)) = output.file else {
                continue;
            };
            let rows = writer.close()?;
            info!(stream = %stream, rows, path = %path.display(), "Wrote parquet file");
            written.push(WrittenFile { stream, path, rows });
        }
        Ok(written)
    }

    /// Drop buffered records and remove files already started
    pub fn abort(self) {
        for (stream, output) in self.outputs {
            if output.file.is_none() {
                continue;
            }
            let path = self.dir.join(format!("{stream}.parquet"));
            drop(output);
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), "Failed to remove partial file: {e}");
            }
        }
    }
}

fn flush(
    stream: &str,
    path: &Path,
    output: &mut StreamOutput,
    config: &ParquetWriterConfig,
) -> Result<()> {
    if output.pending.is_empty() {
        return Ok(());
    }

    let (schema, mut writer) = match output.file.take() {
        Some(file) => file,
        None => {
            let schema = infer_schema(&output.pending);
            let writer = ParquetWriter::new(path, &schema, config)?;
            (schema, writer)
        }
    };

    let lossy = lossy_columns(&schema, &output.pending);
    if !lossy.is_empty() {
        warn!(
            stream,
            columns = ?lossy,
            "Records do not fit the schema of the first row group; values dropped"
        );
    }

    let result = records_to_batch(&output.pending, Some(&schema))
        .and_then(|batch| writer.write(&batch));
    output.file = Some((schema, writer));
    result?;

    output.pending.clear();
    Ok(())
}

/// Columns of `records` whose values cannot be stored under `schema`
fn lossy_columns(schema: &Schema, records: &[Record]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(Value::as_object)
        .flat_map(|obj| obj.iter())
        .filter(|(_, value)| !value.is_null())
        .filter(|(key, value)| match schema.field_with_name(key) {
            Err(_) => true,
            Ok(field) => !fits(field.data_type(), &infer_type(value)),
        })
        .map(|(key, _)| key.clone())
        .collect()
}

fn fits(existing: &DataType, incoming: &DataType) -> bool {
    existing == incoming
        || *existing == DataType::Utf8
        || (*existing == DataType::Float64 && *incoming == DataType::Int64)
}
