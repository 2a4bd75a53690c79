//! Aggregated (L2) and per-order (L3) projections of the book

use crate::book::{Order, OrderBook};
use common::{OrderId, Px, Qty, Side};
use serde::{Deserialize, Serialize};

/// One resting order in the L3 projection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L3Entry {
    /// Price level
    pub price: Px,
    /// Side of the book
    pub side: Side,
    /// Resting size
    pub size: Qty,
    /// Order identifier
    pub order_id: OrderId,
}

/// One aggregated price level in the L2 projection
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2Level {
    /// Price level
    pub price: Px,
    /// Total resting size at this price
    pub size: Qty,
}

/// Both sides of the aggregated book
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct L2View {
    /// Bid levels, best (highest) first
    pub bids: Vec<L2Level>,
    /// Ask levels, best (lowest) first
    pub asks: Vec<L2Level>,
}

impl OrderBook {
    /// Render every resting order, bids then asks
    ///
    /// Levels are visited in ascending price order within each side, and
    /// orders within a level in arrival order. Emptied levels contribute
    /// nothing here since they hold no orders.
    #[must_use]
    pub fn render_l3(&self) -> Vec<L3Entry> {
        let mut entries = Vec::new();
        for side in [Side::Bid, Side::Ask] {
            for (price, level) in self.levels(side) {
                for order in level {
                    entries.push(L3Entry {
                        price: *price,
                        side,
                        size: order.size,
                        order_id: order.order_id,
                    });
                }
            }
        }
        entries
    }

    /// Render the aggregated depth view
    ///
    /// Bids are sorted by descending price, asks by ascending price. Levels
    /// whose aggregate size is zero are filtered out even though they
    /// persist in the underlying maps.
    #[must_use]
    pub fn render_l2(&self) -> L2View {
        L2View {
            bids: aggregate(self.levels(Side::Bid).iter().rev()),
            asks: aggregate(self.levels(Side::Ask).iter()),
        }
    }
}

fn aggregate<'a, I>(levels: I) -> Vec<L2Level>
where
    I: Iterator<Item = (&'a Px, &'a Vec<Order>)>,
{
    levels
        .filter_map(|(price, orders)| {
            let total: i64 = orders.iter().map(|order| order.size.as_i64()).sum();
            (total != 0).then(|| L2Level {
                price: *price,
                size: Qty::from_i64(total),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::DeltaRecord;
    use pretty_assertions::assert_eq;

    fn delta(side: char, price: f64, size: f64, id: u64) -> DeltaRecord {
        DeltaRecord::new(side, Px::new(price), Qty::new(size), OrderId::new(id))
    }

    #[test]
    fn test_l3_single_order() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('B', 100.0, 10.0, 1)).unwrap();

        let l3 = book.render_l3();
        assert_eq!(
            l3,
            vec![L3Entry {
                price: Px::new(100.0),
                side: Side::Bid,
                size: Qty::new(10.0),
                order_id: OrderId::new(1),
            }]
        );
    }

    #[test]
    fn test_l3_groups_bids_before_asks() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('S', 102.0, 1.0, 1)).unwrap();
        book.apply_delta(&delta('B', 100.0, 2.0, 2)).unwrap();
        book.apply_delta(&delta('B', 99.0, 3.0, 3)).unwrap();

        let sides: Vec<Side> = book.render_l3().iter().map(|entry| entry.side).collect();
        assert_eq!(sides, vec![Side::Bid, Side::Bid, Side::Ask]);
    }

    #[test]
    fn test_l3_arrival_order_within_level() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('B', 100.0, 1.0, 10)).unwrap();
        book.apply_delta(&delta('B', 100.0, 2.0, 20)).unwrap();
        book.apply_delta(&delta('B', 100.0, 3.0, 30)).unwrap();

        let ids: Vec<u64> = book
            .render_l3()
            .iter()
            .map(|entry| entry.order_id.as_u64())
            .collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn test_l2_aggregates_per_level() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('B', 100.0, 10.0, 1)).unwrap();
        book.apply_delta(&delta('B', 100.0, 5.0, 2)).unwrap();

        let l2 = book.render_l2();
        assert_eq!(
            l2.bids,
            vec![L2Level {
                price: Px::new(100.0),
                size: Qty::new(15.0),
            }]
        );
        assert!(l2.asks.is_empty());
    }

    #[test]
    fn test_l2_sort_directions() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('B', 99.0, 1.0, 1)).unwrap();
        book.apply_delta(&delta('B', 101.0, 1.0, 2)).unwrap();
        book.apply_delta(&delta('B', 100.0, 1.0, 3)).unwrap();
        book.apply_delta(&delta('S', 105.0, 1.0, 4)).unwrap();
        book.apply_delta(&delta('S', 103.0, 1.0, 5)).unwrap();
        book.apply_delta(&delta('S', 104.0, 1.0, 6)).unwrap();

        let l2 = book.render_l2();
        let bid_prices: Vec<Px> = l2.bids.iter().map(|level| level.price).collect();
        let ask_prices: Vec<Px> = l2.asks.iter().map(|level| level.price).collect();
        assert_eq!(bid_prices, vec![Px::new(101.0), Px::new(100.0), Px::new(99.0)]);
        assert_eq!(ask_prices, vec![Px::new(103.0), Px::new(104.0), Px::new(105.0)]);
    }

    #[test]
    fn test_l2_filters_zeroed_levels() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('B', 100.0, 10.0, 1)).unwrap();
        book.apply_delta(&delta('B', 100.0, 5.0, 2)).unwrap();
        book.apply_delta(&delta('B', 0.0, 0.0, 1)).unwrap();
        book.apply_delta(&delta('B', 0.0, 0.0, 2)).unwrap();

        // The level persists in storage but must not surface in L2.
        assert_eq!(book.best_bid(), Px::new(100.0));
        assert!(book.render_l2().bids.is_empty());
        assert!(book.render_l3().is_empty());
    }

    #[test]
    fn test_l2_zero_size_order_filtered() {
        let mut book = OrderBook::new();
        book.apply_delta(&delta('S', 101.0, 0.0, 1)).unwrap();

        // Resting but zero-size: visible in L3, filtered from L2.
        assert_eq!(book.render_l3().len(), 1);
        assert!(book.render_l2().asks.is_empty());
    }
}
