//! Core book state driven by per-order deltas

use crate::registry::{OrderRegistry, Resting};
use common::{DeltaRecord, OrderId, Px, Qty, Side, Ts};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// A resting order
///
/// Immutable once constructed; a modify replaces the whole order with a new
/// value under the same id, resetting its position in the level queue.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Order identifier
    pub order_id: OrderId,
    /// Side of the book
    pub side: Side,
    /// Resting price
    pub price: Px,
    /// Resting size
    pub size: Qty,
    /// Arrival timestamp, stamped by the book on ingestion
    pub ts: Ts,
}

/// How the book treats malformed or unresolvable input
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Policy {
    /// Coerce unrecognized side indicators to ask and drop deletes for
    /// unknown ids, counting them
    #[default]
    Permissive,
    /// Reject malformed deltas and unknown-id deletes
    Strict,
}

/// What a single delta did to the book
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Applied {
    /// New order inserted
    Add,
    /// Existing order replaced (delete then re-add, queue priority reset)
    Update,
    /// Order removed
    Delete,
    /// Event discarded under the permissive policy
    Dropped,
}

/// Observer invoked after every applied delta
///
/// Keeps logging and other side channels out of the core: the book calls
/// the observer with its post-apply state and what the delta did.
pub trait BookObserver {
    /// Called after each `apply_delta` that returned `Ok`
    fn on_delta(&mut self, book: &OrderBook, applied: Applied);
}

/// Counters accumulated across `apply_delta` calls
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BookStats {
    /// Deltas that inserted a new order
    pub adds: u64,
    /// Deltas that replaced an existing order
    pub updates: u64,
    /// Deltas that removed an order
    pub deletes: u64,
    /// Deltas discarded under the permissive policy
    pub dropped: u64,
    /// Total deltas consumed, including dropped ones
    pub sequence: u64,
}

/// Errors from applying a single delta
///
/// Raised before any mutation; a failed delta never corrupts state for
/// other orders.
#[derive(Debug, thiserror::Error)]
pub enum BookError {
    /// A delete referenced an order id the registry has never seen
    #[error("delete for unknown order {order_id}")]
    UnknownOrder {
        /// The unknown id
        order_id: OrderId,
    },
    /// Rejected by strict validation
    #[error("malformed delta for order {order_id}: {reason}")]
    MalformedDelta {
        /// The offending id
        order_id: OrderId,
        /// What was wrong with the event
        reason: &'static str,
    },
}

/// Full book state for a single instrument
///
/// Two price-keyed level maps plus the order-id registry. Levels are created
/// lazily and never pruned: an emptied level stays addressable and simply
/// reports zero depth, with filtering left to the L2 projection.
pub struct OrderBook {
    bids: BTreeMap<Px, Vec<Order>>,
    asks: BTreeMap<Px, Vec<Order>>,
    registry: OrderRegistry,
    policy: Policy,
    stats: BookStats,
    ts: Ts,
    observer: Option<Box<dyn BookObserver>>,
}

impl std::fmt::Debug for OrderBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderBook")
            .field("bids", &self.bids)
            .field("asks", &self.asks)
            .field("registry", &self.registry)
            .field("policy", &self.policy)
            .field("stats", &self.stats)
            .field("ts", &self.ts)
            .field("observer", &self.observer.as_ref().map(|_| "<observer>"))
            .finish()
    }
}

impl OrderBook {
    /// Create an empty book with the permissive policy
    #[must_use]
    pub fn new() -> Self {
        Self::with_policy(Policy::Permissive)
    }

    /// Create an empty book with an explicit policy
    #[must_use]
    pub fn with_policy(policy: Policy) -> Self {
        Self {
            bids: BTreeMap::new(),
            asks: BTreeMap::new(),
            registry: OrderRegistry::new(),
            policy,
            stats: BookStats::default(),
            ts: Ts::from_micros(0),
            observer: None,
        }
    }

    /// Install an observer invoked after every applied delta
    pub fn set_observer(&mut self, observer: Box<dyn BookObserver>) {
        self.observer = Some(observer);
    }

    /// Remove the installed observer
    pub fn clear_observer(&mut self) {
        self.observer = None;
    }

    /// Apply one delta to the book
    ///
    /// Stamps the event with a fresh microsecond arrival timestamp, then
    /// dispatches in fixed order: zero price is a delete, an unseen id an
    /// add, anything else a modify (delete then re-add with the incoming
    /// side, price and size, so an order may switch sides). Exactly one
    /// side's level map and the registry are mutated per delta, except for
    /// a side-switching modify which touches both in its delete/add pair.
    pub fn apply_delta(&mut self, delta: &DeltaRecord) -> Result<Applied, BookError> {
        let ts = Ts::now();
        let applied = self.dispatch(delta, ts)?;

        self.ts = ts;
        self.stats.sequence += 1;
        match applied {
            Applied::Add => self.stats.adds += 1,
            Applied::Update => self.stats.updates += 1,
            Applied::Delete => self.stats.deletes += 1,
            Applied::Dropped => self.stats.dropped += 1,
        }

        if let Some(mut observer) = self.observer.take() {
            observer.on_delta(self, applied);
            self.observer = Some(observer);
        }

        Ok(applied)
    }

    fn dispatch(&mut self, delta: &DeltaRecord, ts: Ts) -> Result<Applied, BookError> {
        if delta.is_delete() {
            return self.delete(delta.order_id);
        }

        let side = self.decode_side(delta)?;
        if self.policy == Policy::Strict {
            if delta.price < Px::ZERO {
                return Err(BookError::MalformedDelta {
                    order_id: delta.order_id,
                    reason: "negative price",
                });
            }
            if delta.size < Qty::ZERO {
                return Err(BookError::MalformedDelta {
                    order_id: delta.order_id,
                    reason: "negative size",
                });
            }
        }

        let order = Order {
            order_id: delta.order_id,
            side,
            price: delta.price,
            size: delta.size,
            ts,
        };

        match self.registry.lookup(delta.order_id) {
            Some(resting) => {
                self.remove_resting(delta.order_id, resting);
                self.insert(order);
                Ok(Applied::Update)
            }
            None => {
                self.insert(order);
                Ok(Applied::Add)
            }
        }
    }

    fn decode_side(&self, delta: &DeltaRecord) -> Result<Side, BookError> {
        match Side::decode(delta.side) {
            Some(side) => Ok(side),
            None => match self.policy {
                Policy::Permissive => Ok(Side::Ask),
                Policy::Strict => Err(BookError::MalformedDelta {
                    order_id: delta.order_id,
                    reason: "unrecognized side indicator",
                }),
            },
        }
    }

    fn delete(&mut self, order_id: OrderId) -> Result<Applied, BookError> {
        match self.registry.lookup(order_id) {
            Some(resting) => {
                self.remove_resting(order_id, resting);
                self.registry.unregister(order_id);
                Ok(Applied::Delete)
            }
            None => match self.policy {
                Policy::Permissive => {
                    debug!(%order_id, "dropping delete for unknown order");
                    Ok(Applied::Dropped)
                }
                Policy::Strict => Err(BookError::UnknownOrder { order_id }),
            },
        }
    }

    fn insert(&mut self, order: Order) {
        self.registry.register(order.order_id, order.side, order.price);
        self.side_mut(order.side)
            .entry(order.price)
            .or_default()
            .push(order);
    }

    fn remove_resting(&mut self, order_id: OrderId, resting: Resting) {
        // The emptied level stays in the map; the L2 projection filters it.
        if let Some(level) = self.side_mut(resting.side).get_mut(&resting.price) {
            level.retain(|order| order.order_id != order_id);
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut BTreeMap<Px, Vec<Order>> {
        match side {
            Side::Bid => &mut self.bids,
            Side::Ask => &mut self.asks,
        }
    }

    pub(crate) const fn levels(&self, side: Side) -> &BTreeMap<Px, Vec<Order>> {
        match side {
            Side::Bid => &self.bids,
            Side::Ask => &self.asks,
        }
    }

    /// Orders resting at a price level, in arrival order
    ///
    /// Empty for levels that were never touched and for emptied ones alike.
    #[must_use]
    pub fn level(&self, side: Side, price: Px) -> &[Order] {
        self.levels(side)
            .get(&price)
            .map_or(&[], Vec::as_slice)
    }

    /// Best bid price
    ///
    /// The maximum key among bid levels; `Px::ZERO` when the bid map has
    /// never held a level. A present-but-emptied level still counts.
    #[must_use]
    pub fn best_bid(&self) -> Px {
        self.bids.keys().next_back().copied().unwrap_or(Px::ZERO)
    }

    /// Best ask price
    ///
    /// The minimum key among ask levels; `Px::MAX` when none exist.
    #[must_use]
    pub fn best_ask(&self) -> Px {
        self.asks.keys().next().copied().unwrap_or(Px::MAX)
    }

    /// Spread in ticks (ask minus bid), saturating
    ///
    /// Negative for a crossed book, `i64::MAX` territory when a side is
    /// empty. Never clamped beyond saturation.
    #[must_use]
    pub fn spread(&self) -> i64 {
        self.best_ask()
            .as_i64()
            .saturating_sub(self.best_bid().as_i64())
    }

    /// Mid price, when both sides have at least one level
    #[must_use]
    pub fn mid(&self) -> Option<Px> {
        if self.bids.is_empty() || self.asks.is_empty() {
            return None;
        }
        let mid_ticks = (self.best_bid().as_i64() + self.best_ask().as_i64()) / 2;
        Some(Px::from_i64(mid_ticks))
    }

    /// Check if the book is crossed (bid >= ask)
    ///
    /// A query only. Crossed and inverted books are valid transient states
    /// of the feed and are never rejected by `apply_delta`.
    #[must_use]
    pub fn is_crossed(&self) -> bool {
        !self.bids.is_empty() && !self.asks.is_empty() && self.best_bid() >= self.best_ask()
    }

    /// The order-id registry
    #[must_use]
    pub const fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    /// Apply statistics accumulated so far
    #[must_use]
    pub const fn stats(&self) -> BookStats {
        self.stats
    }

    /// Arrival timestamp of the last applied delta
    #[must_use]
    pub const fn ts(&self) -> Ts {
        self.ts
    }
}

impl Default for OrderBook {
    fn default() -> Self {
        Self::new()
    }
}
