//! Incremental limit order book reconstruction
//!
//! Rebuilds per-order (L3) book state from a stream of add/modify/delete
//! deltas and projects aggregated (L2) and per-order (L3) views from it.

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod book;
pub mod registry;
pub mod view;

pub use book::{Applied, BookError, BookObserver, BookStats, Order, OrderBook, Policy};
pub use registry::{OrderRegistry, Resting};
pub use view::{L2Level, L2View, L3Entry};
