//! Drives a delta capture through the book

use crate::observer::LogObserver;
use crate::reader::{DeltaReader, write_corrected};
use anyhow::{Context, Result};
use lob::{Applied, OrderBook, Policy};
use std::path::PathBuf;
use tracing::info;

/// Replay configuration
#[derive(Clone, Debug)]
pub struct ReplayConfig {
    /// Capture path (`.csv` or `.csv.gz`)
    pub path: PathBuf,
    /// Undo the upstream px/qty column inversion
    pub swap_px_qty: bool,
    /// Also write the corrected capture to this path
    pub corrected: Option<PathBuf>,
    /// Reject malformed deltas instead of coercing them
    pub strict: bool,
    /// Log full L2/L3 state after every delta
    pub log_state: bool,
}

impl ReplayConfig {
    /// Configuration for a raw upstream capture with per-delta logging
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            swap_px_qty: true,
            corrected: None,
            strict: false,
            log_state: true,
        }
    }
}

/// Outcome of a replay run
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReplayStatus {
    /// Data rows consumed from the capture
    pub rows: u64,
    /// Deltas that mutated the book
    pub applied: u64,
    /// Deltas dropped under the permissive policy
    pub dropped: u64,
}

/// Replays a capture into a fresh book
pub struct Replayer {
    config: ReplayConfig,
}

impl Replayer {
    /// Create a replayer for the given configuration
    pub fn new(config: ReplayConfig) -> Self {
        Self { config }
    }

    /// Run the replay, returning the reconstructed book and run statistics
    ///
    /// Under the permissive policy unknown-id deletes are dropped and
    /// counted; under strict mode the first malformed delta aborts the run.
    pub fn run(&self) -> Result<(OrderBook, ReplayStatus)> {
        if let Some(corrected) = &self.config.corrected {
            write_corrected(&self.config.path, corrected)?;
        }

        let policy = if self.config.strict {
            Policy::Strict
        } else {
            Policy::Permissive
        };
        let mut book = OrderBook::with_policy(policy);
        if self.config.log_state {
            book.set_observer(Box::new(LogObserver::new()));
        }

        let mut status = ReplayStatus::default();
        let reader = DeltaReader::open(&self.config.path, self.config.swap_px_qty)?;
        for delta in reader {
            let delta = delta?;
            status.rows += 1;
            let applied = book
                .apply_delta(&delta)
                .with_context(|| format!("applying capture row {}", status.rows))?;
            match applied {
                Applied::Dropped => status.dropped += 1,
                Applied::Add | Applied::Update | Applied::Delete => status.applied += 1,
            }
        }

        info!(
            rows = status.rows,
            applied = status.applied,
            dropped = status.dropped,
            "replay complete"
        );
        Ok((book, status))
    }
}
