//! Per-delta state logging
//!
//! After every applied delta the full L2 and L3 state of the book is
//! written to the tracing subscriber, one line per level and per order.

use lob::{Applied, BookObserver, OrderBook};
use tracing::info;

/// Observer that logs L2 and L3 book state after every applied delta
#[derive(Debug, Default)]
pub struct LogObserver {
    deltas_seen: u64,
}

impl LogObserver {
    /// Create a new logging observer
    pub fn new() -> Self {
        Self::default()
    }
}

impl BookObserver for LogObserver {
    fn on_delta(&mut self, book: &OrderBook, applied: Applied) {
        self.deltas_seen += 1;
        info!(delta = self.deltas_seen, ?applied, "applied delta");

        let l2 = book.render_l2();
        info!("l2 buy side:");
        for level in &l2.bids {
            info!(price = %level.price, total_size = %level.size, "l2 level");
        }
        info!("l2 sell side:");
        for level in &l2.asks {
            info!(price = %level.price, total_size = %level.size, "l2 level");
        }

        info!("l3 orders:");
        for entry in book.render_l3() {
            info!(
                price = %entry.price,
                side = %entry.side,
                size = %entry.size,
                order_id = %entry.order_id,
                "l3 order"
            );
        }
    }
}
