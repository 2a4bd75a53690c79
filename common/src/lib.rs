//! Common types for the lobrec order book toolkit

#![deny(warnings)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
#![deny(clippy::cargo)]
#![deny(dead_code)]
#![deny(unused)]
#![deny(missing_docs)]
#![forbid(unsafe_code)]

pub mod delta;
pub mod types;

pub use delta::DeltaRecord;
pub use types::{OrderId, Px, Qty, Side, Ts};
