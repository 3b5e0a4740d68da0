//! The order ledger.
//!
//! Orders are value snapshots of a menu entry plus a quantity, kept in
//! placement order. The ledger is persisted as a JSON array of
//! `{"item": {"name", "price"}, "quantity"}` records, and lives in memory
//! behind a [`LedgerCell`] that hands out an append-only [`OrderSink`] and a
//! read-only [`LedgerView`].

use std::num::NonZeroU32;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::catalog::{MenuEntry, Price};
use crate::error::{Error, Result};

/// How many of an item were ordered. Always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A quantity of one.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Wrap a count, returning `None` for zero.
    #[must_use]
    pub fn new(count: u32) -> Option<Self> {
        NonZeroU32::new(count).map(Self)
    }

    /// The count as a plain integer.
    #[must_use]
    pub fn get(self) -> u32 {
        self.0.get()
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A value copy of a menu entry taken when an order is placed.
///
/// Images are not carried over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemSnapshot {
    /// Name at the time of ordering.
    pub name: String,
    /// Unit price at the time of ordering.
    pub price: Price,
}

impl From<&MenuEntry> for ItemSnapshot {
    fn from(entry: &MenuEntry) -> Self {
        Self {
            name: entry.name.clone(),
            price: entry.price,
        }
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// What was ordered.
    pub item: ItemSnapshot,
    /// How many.
    pub quantity: Quantity,
}

impl Order {
    /// Create an order for a snapshot of `entry`.
    #[must_use]
    pub fn new(entry: &MenuEntry, quantity: Quantity) -> Self {
        Self {
            item: ItemSnapshot::from(entry),
            quantity,
        }
    }

    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> u64 {
        u64::from(self.item.price) * u64::from(self.quantity.get())
    }

    fn check(&self) -> std::result::Result<(), String> {
        if self.item.name.trim().is_empty() {
            return Err("order item has an empty name".to_string());
        }
        Ok(())
    }
}

/// Orders in placement order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ledger {
    orders: Vec<Order>,
}

impl Ledger {
    /// Create an empty ledger.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an order at the end.
    pub fn push(&mut self, order: Order) {
        self.orders.push(order);
    }

    /// All orders, oldest first.
    #[must_use]
    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Iterate over orders, oldest first.
    pub fn iter(&self) -> std::slice::Iter<'_, Order> {
        self.orders.iter()
    }

    /// Number of orders.
    #[must_use]
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    /// Whether no orders have been placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// The most recent order.
    #[must_use]
    pub fn last(&self) -> Option<&Order> {
        self.orders.last()
    }

    /// Sum of all line totals.
    ///
    /// Widened to `u128` so any number of maximal line totals can be added.
    #[must_use]
    pub fn grand_total(&self) -> u128 {
        self.orders
            .iter()
            .map(|order| u128::from(order.line_total()))
            .sum()
    }

    /// Serialize to the persisted JSON form.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Decode a persisted value, rejecting it if any record is invalid.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLedger`] if the value is not an array of
    /// valid orders.
    pub fn from_json(key: &str, raw: &str) -> Result<Self> {
        let ledger: Self =
            serde_json::from_str(raw).map_err(|e| Error::malformed_ledger(key, e.to_string()))?;
        for (index, order) in ledger.iter().enumerate() {
            order
                .check()
                .map_err(|message| Error::malformed_ledger(key, format!("order {index}: {message}")))?;
        }
        Ok(ledger)
    }

    /// Decode a persisted value, keeping every record that is valid.
    ///
    /// Returns the ledger and the number of records dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLedger`] if the value is not a JSON array.
    pub fn from_json_lenient(key: &str, raw: &str) -> Result<(Self, usize)> {
        let records: Vec<serde_json::Value> =
            serde_json::from_str(raw).map_err(|e| Error::malformed_ledger(key, e.to_string()))?;

        let mut ledger = Self::new();
        let mut dropped = 0;
        for (index, record) in records.into_iter().enumerate() {
            let decoded = serde_json::from_value::<Order>(record)
                .map_err(|e| e.to_string())
                .and_then(|order| order.check().map(|()| order));
            match decoded {
                Ok(order) => ledger.push(order),
                Err(message) => {
                    warn!("Dropping order {index} under {key:?}: {message}");
                    dropped += 1;
                }
            }
        }
        Ok((ledger, dropped))
    }
}

impl<'a> IntoIterator for &'a Ledger {
    type Item = &'a Order;
    type IntoIter = std::slice::Iter<'a, Order>;

    fn into_iter(self) -> Self::IntoIter {
        self.orders.iter()
    }
}

impl FromIterator<Order> for Ledger {
    fn from_iter<I: IntoIterator<Item = Order>>(iter: I) -> Self {
        Self {
            orders: iter.into_iter().collect(),
        }
    }
}

/// Owner of the authoritative in-memory ledger.
///
/// Every change is published to subscribers of the underlying watch channel.
#[derive(Debug, Clone)]
pub struct LedgerCell {
    tx: Arc<watch::Sender<Ledger>>,
}

impl Default for LedgerCell {
    fn default() -> Self {
        Self::new(Ledger::new())
    }
}

impl LedgerCell {
    /// Create a cell holding `ledger`.
    #[must_use]
    pub fn new(ledger: Ledger) -> Self {
        let (tx, _rx) = watch::channel(ledger);
        Self { tx: Arc::new(tx) }
    }

    /// Replace the whole ledger, notifying subscribers.
    pub fn replace(&self, ledger: Ledger) {
        debug!("Ledger replaced with {} orders", ledger.len());
        self.tx.send_replace(ledger);
    }

    /// Append-only handle for placing orders.
    #[must_use]
    pub fn sink(&self) -> OrderSink {
        OrderSink {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Read-only handle on the ledger.
    #[must_use]
    pub fn view(&self) -> LedgerView {
        LedgerView {
            rx: self.tx.subscribe(),
        }
    }

    /// A receiver that is notified on every later change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Ledger> {
        self.tx.subscribe()
    }
}

/// Append-only access to the ledger.
#[derive(Debug, Clone)]
pub struct OrderSink {
    tx: Arc<watch::Sender<Ledger>>,
}

impl OrderSink {
    /// Append `order` and notify subscribers.
    pub fn append(&self, order: Order) {
        self.tx.send_modify(|ledger| {
            ledger.push(order);
            debug!("Ledger now holds {} orders", ledger.len());
        });
    }
}

/// Read-only access to the ledger.
#[derive(Debug, Clone)]
pub struct LedgerView {
    rx: watch::Receiver<Ledger>,
}

impl LedgerView {
    /// Run `f` against the current ledger.
    pub fn with<R>(&self, f: impl FnOnce(&Ledger) -> R) -> R {
        f(&self.rx.borrow())
    }

    /// Clone the current ledger.
    #[must_use]
    pub fn snapshot(&self) -> Ledger {
        self.rx.borrow().clone()
    }

    /// Wait until the ledger changes after the last observed value.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning cell has been dropped.
    pub async fn changed(&mut self) -> Result<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| Error::internal("ledger owner dropped"))
    }
}
