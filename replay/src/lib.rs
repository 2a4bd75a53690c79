//! Capture replay for order book reconstruction
//!
//! Reads per-order delta captures (plain or gzip-compressed CSV), corrects
//! the upstream column inversion, and drives the rows through a `lob`
//! book one delta at a time.

#![deny(warnings)]
#![deny(clippy::all)]

pub mod observer;
pub mod reader;
pub mod replayer;

pub use observer::LogObserver;
pub use reader::{DeltaReader, ReadError, write_corrected};
pub use replayer::{ReplayConfig, ReplayStatus, Replayer};
