//! Chunked Parquet persistence.
//!
//! Rows accumulate in an in-memory buffer and are flushed as one Parquet
//! file per chunk. Chunk files are append-structured: new files only, never
//! rewritten, with names derived from `(option_type, worker_id,
//! chunk_index)` so concurrent workers can share one output directory
//! without locking.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parquet::basic::{Compression, Repetition, Type as PhysicalType};
use parquet::data_type::DoubleType;
use parquet::file::properties::WriterProperties;
use parquet::file::writer::SerializedFileWriter;
use parquet::schema::types::Type;
use simgen_core::types::OptionKind;
use tracing::debug;

use crate::error::HarnessError;
use crate::sampler::ParameterDraw;

/// Column names of the fixed row schema, in file order.
pub const COLUMN_NAMES: [&str; 11] = [
    "S",
    "K",
    "r",
    "q",
    "T",
    "v0",
    "heston_theta",
    "heston_kappa",
    "heston_sigma",
    "heston_rho",
    "price",
];

/// One priced row, immutable once flushed.
///
/// A NaN price marks a row whose pricing call failed; the draw itself is
/// always recorded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PricedRow {
    /// The sampled parameter tuple.
    pub draw: ParameterDraw,
    /// The oracle price, or NaN on failure.
    pub price: f64,
}

impl PricedRow {
    /// Pairs a draw with its price.
    pub fn new(draw: ParameterDraw, price: f64) -> Self {
        Self { draw, price }
    }

    /// True when the price is the failure sentinel.
    pub fn is_failure(&self) -> bool {
        self.price.is_nan()
    }

    /// The row's column values in [`COLUMN_NAMES`] order.
    pub fn values(&self) -> [f64; COLUMN_NAMES.len()] {
        [
            self.draw.spot,
            self.draw.strike,
            self.draw.rate,
            self.draw.dividend,
            self.draw.expiry_years,
            self.draw.v0,
            self.draw.theta,
            self.draw.kappa,
            self.draw.sigma,
            self.draw.rho,
            self.price,
        ]
    }
}

/// Deterministic chunk file name for `(option_type, worker_id, chunk_index)`.
///
/// # Examples
///
/// ```
/// use simgen_core::types::OptionKind;
/// use simgen_harness::chunk::chunk_file_name;
///
/// assert_eq!(
///     chunk_file_name(OptionKind::Put, 0, 0),
///     "put_worker000_chunk00000.parquet"
/// );
/// ```
pub fn chunk_file_name(kind: OptionKind, worker_id: u32, chunk_index: u32) -> String {
    format!(
        "{}_worker{:03}_chunk{:05}.parquet",
        kind.file_tag(),
        worker_id,
        chunk_index
    )
}

/// Buffered writer producing one Parquet file per chunk.
///
/// [`ChunkWriter::maybe_flush`] flushes once the buffer reaches the chunk
/// size; [`ChunkWriter::flush`] flushes unconditionally and is the final
/// step of a worker's loop, so the last partial chunk is never dropped.
pub struct ChunkWriter {
    out_dir: PathBuf,
    option_kind: OptionKind,
    worker_id: u32,
    chunk_size: usize,
    chunk_index: u32,
    buffer: Vec<PricedRow>,
    schema: Arc<Type>,
}

impl ChunkWriter {
    /// Creates a writer, creating the output directory if absent.
    pub fn new(
        out_dir: &Path,
        option_kind: OptionKind,
        worker_id: u32,
        chunk_size: usize,
    ) -> Result<Self, HarnessError> {
        fs::create_dir_all(out_dir)?;
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
            option_kind,
            worker_id,
            chunk_size,
            chunk_index: 0,
            buffer: Vec::with_capacity(chunk_size),
            schema: row_schema()?,
        })
    }

    /// Appends one priced row to the buffer.
    pub fn append(&mut self, row: PricedRow) {
        self.buffer.push(row);
    }

    /// Number of rows currently buffered.
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Number of chunk files written so far.
    pub fn chunks_written(&self) -> u32 {
        self.chunk_index
    }

    /// Flushes when the buffer has reached the chunk size.
    pub fn maybe_flush(&mut self) -> Result<Option<PathBuf>, HarnessError> {
        if self.buffer.len() >= self.chunk_size {
            self.flush()
        } else {
            Ok(None)
        }
    }

    /// Flushes the buffer unconditionally; a no-op when it is empty.
    ///
    /// Rows are written in insertion order, then the buffer is cleared and
    /// the chunk index advances.
    pub fn flush(&mut self) -> Result<Option<PathBuf>, HarnessError> {
        if self.buffer.is_empty() {
            return Ok(None);
        }

        let path = self.out_dir.join(chunk_file_name(
            self.option_kind,
            self.worker_id,
            self.chunk_index,
        ));

        let mut columns: Vec<Vec<f64>> =
            vec![Vec::with_capacity(self.buffer.len()); COLUMN_NAMES.len()];
        for row in &self.buffer {
            for (column, value) in columns.iter_mut().zip(row.values()) {
                column.push(value);
            }
        }

        let file = fs::File::create(&path)?;
        let properties = Arc::new(
            WriterProperties::builder()
                .set_compression(Compression::UNCOMPRESSED)
                .build(),
        );
        let mut writer = SerializedFileWriter::new(file, self.schema.clone(), properties)?;
        let mut row_group = writer.next_row_group()?;
        let mut column_index = 0;
        while let Some(mut column) = row_group.next_column()? {
            column
                .typed::<DoubleType>()
                .write_batch(&columns[column_index], None, None)?;
            column.close()?;
            column_index += 1;
        }
        row_group.close()?;
        writer.close()?;

        debug!(
            path = %path.display(),
            rows = self.buffer.len(),
            "flushed chunk"
        );
        self.buffer.clear();
        self.chunk_index += 1;
        Ok(Some(path))
    }
}

/// The fixed 11-column double schema.
fn row_schema() -> Result<Arc<Type>, parquet::errors::ParquetError> {
    let mut fields = Vec::with_capacity(COLUMN_NAMES.len());
    for name in COLUMN_NAMES {
        fields.push(Arc::new(
            Type::primitive_type_builder(name, PhysicalType::DOUBLE)
                .with_repetition(Repetition::REQUIRED)
                .build()?,
        ));
    }
    Ok(Arc::new(
        Type::group_type_builder("parameter_row")
            .with_fields(fields)
            .build()?,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::ParameterSampler;
    use parquet::file::reader::{FileReader, SerializedFileReader};
    use parquet::record::RowAccessor;

    fn test_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join("simgen_chunk_tests").join(name);
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    fn priced_rows(n: usize) -> Vec<PricedRow> {
        let mut sampler = ParameterSampler::from_seed(17);
        (0..n)
            .map(|i| PricedRow::new(sampler.next_draw(), i as f64))
            .collect()
    }

    #[test]
    fn test_file_names_are_zero_padded() {
        assert_eq!(
            chunk_file_name(OptionKind::Call, 12, 345),
            "call_worker012_chunk00345.parquet"
        );
    }

    #[test]
    fn test_flush_on_empty_buffer_is_a_no_op() {
        let dir = test_dir("empty_flush");
        let mut writer = ChunkWriter::new(&dir, OptionKind::Call, 0, 10).unwrap();
        assert_eq!(writer.flush().unwrap(), None);
        assert_eq!(writer.chunks_written(), 0);
    }

    #[test]
    fn test_maybe_flush_waits_for_the_threshold() {
        let dir = test_dir("threshold");
        let mut writer = ChunkWriter::new(&dir, OptionKind::Call, 0, 3).unwrap();
        let rows = priced_rows(3);

        writer.append(rows[0]);
        writer.append(rows[1]);
        assert_eq!(writer.maybe_flush().unwrap(), None);
        assert_eq!(writer.buffered(), 2);

        writer.append(rows[2]);
        let path = writer.maybe_flush().unwrap().expect("full buffer flushes");
        assert!(path.ends_with("call_worker000_chunk00000.parquet"));
        assert_eq!(writer.buffered(), 0);
        assert_eq!(writer.chunks_written(), 1);
    }

    #[test]
    fn test_flushed_rows_read_back_in_insertion_order() {
        let dir = test_dir("round_trip");
        let mut writer = ChunkWriter::new(&dir, OptionKind::Put, 4, 8).unwrap();
        let mut rows = priced_rows(5);
        rows[2].price = f64::NAN;
        for row in &rows {
            writer.append(*row);
        }
        let path = writer.flush().unwrap().unwrap();

        let reader = SerializedFileReader::new(fs::File::open(path).unwrap()).unwrap();
        assert_eq!(reader.metadata().file_metadata().num_rows(), 5);

        for (i, read) in reader.get_row_iter(None).unwrap().enumerate() {
            let read = read.unwrap();
            let expected = rows[i].values();
            for (column, &value) in expected.iter().enumerate() {
                let stored = read.get_double(column).unwrap();
                if value.is_nan() {
                    assert!(stored.is_nan());
                } else {
                    assert_eq!(stored, value);
                }
            }
        }
    }

    #[test]
    fn test_writer_creates_missing_output_directory() {
        let dir = test_dir("nested").join("a").join("b");
        assert!(ChunkWriter::new(&dir, OptionKind::Call, 0, 10).is_ok());
        assert!(dir.is_dir());
        // Construction is idempotent when the directory already exists.
        assert!(ChunkWriter::new(&dir, OptionKind::Call, 0, 10).is_ok());
    }
}
