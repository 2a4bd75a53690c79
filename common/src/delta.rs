//! Raw per-order delta events

use crate::types::{OrderId, Px, Qty};
use serde::{Deserialize, Serialize};

/// A single per-order event from the feed
///
/// The side stays an undecoded wire indicator here; how a non-`'B'` value is
/// interpreted is a policy decision that belongs to the book, not the record.
/// A zero price marks the event as a delete of the referenced order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeltaRecord {
    /// Side indicator as received (`'B'` = bid)
    pub side: char,
    /// Price level, `Px::ZERO` for deletes
    pub price: Px,
    /// Order size
    pub size: Qty,
    /// Order identifier
    pub order_id: OrderId,
}

impl DeltaRecord {
    /// Create a new delta record
    #[must_use]
    pub const fn new(side: char, price: Px, size: Qty, order_id: OrderId) -> Self {
        Self {
            side,
            price,
            size,
            order_id,
        }
    }

    /// Check if this delta deletes its order
    #[must_use]
    pub const fn is_delete(&self) -> bool {
        self.price.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_sentinel() {
        let delta = DeltaRecord::new('B', Px::ZERO, Qty::new(10.0), OrderId::new(7));
        assert!(delta.is_delete());

        let delta = DeltaRecord::new('B', Px::new(100.0), Qty::new(10.0), OrderId::new(7));
        assert!(!delta.is_delete());
    }

    #[test]
    fn test_delta_serde() -> Result<(), Box<dyn std::error::Error>> {
        let delta = DeltaRecord::new('S', Px::new(99.5), Qty::new(25.0), OrderId::new(42));
        let encoded = serde_json::to_string(&delta)?;
        let decoded: DeltaRecord = serde_json::from_str(&encoded)?;
        assert_eq!(delta, decoded);
        Ok(())
    }
}
