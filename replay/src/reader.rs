//! Delta capture reader
//!
//! Captures are CSV files (optionally gzip-compressed) with one row per
//! delta: `orderSide,px,qty,orderId`. The upstream capture process wrote
//! prices into `qty` and quantities into `px`; the reader swaps them back
//! by default so downstream code only ever sees corrected rows.

use anyhow::Context;
use common::{DeltaRecord, OrderId, Px, Qty};
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};
use tracing::info;

/// A capture row in its on-disk column layout
#[derive(Debug, Deserialize, Serialize)]
struct RawRow {
    #[serde(rename = "orderSide")]
    order_side: String,
    px: f64,
    qty: f64,
    #[serde(rename = "orderId")]
    order_id: u64,
}

/// Errors from reading a delta capture
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// The capture file could not be opened
    #[error("failed to open capture {}", .path.display())]
    Open {
        /// Capture path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
    /// A row failed to parse
    #[error("malformed capture row {row}")]
    Row {
        /// 1-based data row number
        row: u64,
        /// Underlying CSV error
        #[source]
        source: csv::Error,
    },
    /// A row carried an empty side field
    #[error("capture row {row} has an empty side field")]
    EmptySide {
        /// 1-based data row number
        row: u64,
    },
}

/// Streaming reader over a delta capture
pub struct DeltaReader {
    rows: csv::DeserializeRecordsIntoIter<Box<dyn Read>, RawRow>,
    swap_px_qty: bool,
    row: u64,
}

impl DeltaReader {
    /// Open a capture, transparently decompressing `.gz` files
    ///
    /// `swap_px_qty` undoes the upstream column inversion and should be on
    /// for raw captures; pass `false` only for already-corrected files.
    pub fn open(path: &Path, swap_px_qty: bool) -> Result<Self, ReadError> {
        let file = File::open(path).map_err(|source| ReadError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: Box<dyn Read> = if path.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzDecoder::new(BufReader::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };
        Ok(Self {
            rows: csv::Reader::from_reader(raw).into_deserialize(),
            swap_px_qty,
            row: 0,
        })
    }

    fn convert(&self, raw: &RawRow) -> Result<DeltaRecord, ReadError> {
        let side = raw
            .order_side
            .chars()
            .next()
            .ok_or(ReadError::EmptySide { row: self.row })?;
        let (px, qty) = if self.swap_px_qty {
            (raw.qty, raw.px)
        } else {
            (raw.px, raw.qty)
        };
        Ok(DeltaRecord::new(
            side,
            Px::new(px),
            Qty::new(qty),
            OrderId::new(raw.order_id),
        ))
    }
}

impl Iterator for DeltaReader {
    type Item = Result<DeltaRecord, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.row += 1;
        match self.rows.next()? {
            Ok(raw) => Some(self.convert(&raw)),
            Err(source) => Some(Err(ReadError::Row {
                row: self.row,
                source,
            })),
        }
    }
}

/// Write a corrected copy of a capture with `px`/`qty` restored
///
/// Returns the number of data rows written.
pub fn write_corrected(input: &Path, output: &Path) -> anyhow::Result<u64> {
    let mut writer = csv::Writer::from_path(output)
        .with_context(|| format!("creating corrected capture {}", output.display()))?;

    let mut rows = 0u64;
    for delta in DeltaReader::open(input, true)? {
        let delta = delta?;
        writer.serialize(RawRow {
            order_side: delta.side.to_string(),
            px: delta.price.as_f64(),
            qty: delta.size.as_f64(),
            order_id: delta.order_id.as_u64(),
        })?;
        rows += 1;
    }
    writer
        .flush()
        .with_context(|| format!("flushing corrected capture {}", output.display()))?;

    info!(rows, path = %output.display(), "wrote corrected capture");
    Ok(rows)
}
