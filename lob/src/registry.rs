//! Order-id index over resting orders

use common::{OrderId, Px, Side};
use rustc_hash::FxHashMap;

/// Where an order currently rests
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Resting {
    /// Side of the book holding the order
    pub side: Side,
    /// Price level key
    pub price: Px,
}

/// Back-reference index from order id to its resting side and price level
///
/// Pure lookup table with no validation; keeping it consistent with the
/// level maps is the book's responsibility. Holding the side as well as the
/// price lets a delete find the owning level without trusting the delta's
/// own side field.
#[derive(Clone, Debug, Default)]
pub struct OrderRegistry {
    entries: FxHashMap<OrderId, Resting>,
}

impl OrderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve an order id to its resting location
    #[must_use]
    pub fn lookup(&self, order_id: OrderId) -> Option<Resting> {
        self.entries.get(&order_id).copied()
    }

    /// Insert or overwrite the location recorded for an order id
    pub fn register(&mut self, order_id: OrderId, side: Side, price: Px) {
        self.entries.insert(order_id, Resting { side, price });
    }

    /// Remove an order id; no-op if it was never registered
    pub fn unregister(&mut self, order_id: OrderId) {
        self.entries.remove(&order_id);
    }

    /// Check whether an order id is currently registered
    #[must_use]
    pub fn contains(&self, order_id: OrderId) -> bool {
        self.entries.contains_key(&order_id)
    }

    /// Number of registered orders
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check whether the registry is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
