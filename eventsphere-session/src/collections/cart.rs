use std::sync::Arc;

use tracing::{debug, info};

use eventsphere_core::{
    CartEntry, EventRecord, Result, SphereError, MAX_QUANTITY, MIN_QUANTITY,
};

use crate::checkout::{CheckoutGateway, CheckoutReceipt};
use crate::notify::{ChangeBus, ChangeEvent};
use crate::store::{keys, KvStore};

/// Service fee applied to the subtotal at checkout.
pub const SERVICE_FEE_RATE: f64 = 0.05;
/// Flat processing fee per order.
pub const PROCESSING_FEE: f64 = 2.99;

/// Checkout summary derived from the current cart contents.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderSummary {
    pub subtotal: f64,
    pub service_fee: f64,
    pub processing_fee: f64,
    pub total: f64,
    pub item_count: u32,
}

/// The ticket cart: a persisted collection of event snapshots with
/// quantities, at most one entry per event id.
///
/// Like the favorites list, the store is authoritative; mutations are
/// read-modify-write followed by one broadcast of the new snapshot.
pub struct Cart {
    store: Arc<dyn KvStore>,
    bus: Arc<ChangeBus>,
}

impl Cart {
    pub fn new(store: Arc<dyn KvStore>, bus: Arc<ChangeBus>) -> Self {
        Self { store, bus }
    }

    pub fn entries(&self) -> Result<Vec<CartEntry>> {
        super::read_collection(self.store.as_ref(), keys::CART)
    }

    pub fn contains(&self, id: u32) -> Result<bool> {
        Ok(self.entries()?.iter().any(|entry| entry.event.id == id))
    }

    /// Adds an event with quantity 1. A duplicate add is refused: callers are
    /// expected to adjust the quantity of the existing entry instead.
    pub fn add(&self, event: &EventRecord) -> Result<()> {
        let mut entries = self.entries()?;
        if entries.iter().any(|entry| entry.event.id == event.id) {
            return Err(SphereError::AlreadyInCart(event.id));
        }
        entries.push(CartEntry::new(event.clone()));
        self.save(entries)?;
        info!(event_id = event.id, "added to cart");
        Ok(())
    }

    /// Removes by id. Returns false if the id was not present.
    pub fn remove(&self, id: u32) -> Result<bool> {
        let mut entries = self.entries()?;
        let before = entries.len();
        entries.retain(|entry| entry.event.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.save(entries)?;
        info!(event_id = id, "removed from cart");
        Ok(true)
    }

    /// Adjusts a line quantity by `delta` (may be negative), clamping to the
    /// [1, 10] range. Returns the new quantity.
    pub fn adjust_quantity(&self, id: u32, delta: i64) -> Result<u32> {
        let mut entries = self.entries()?;
        let entry = entries
            .iter_mut()
            .find(|entry| entry.event.id == id)
            .ok_or(SphereError::NotFound(id))?;
        let quantity = (entry.quantity as i64 + delta)
            .clamp(MIN_QUANTITY as i64, MAX_QUANTITY as i64) as u32;
        if quantity == entry.quantity {
            debug!(event_id = id, quantity, "quantity unchanged by clamp");
            return Ok(quantity);
        }
        entry.quantity = quantity;
        self.save(entries)?;
        Ok(quantity)
    }

    /// Whether the increment button for this line should be enabled.
    pub fn can_increment(&self, id: u32) -> Result<bool> {
        Ok(self
            .find(id)?
            .map(|entry| entry.quantity < MAX_QUANTITY)
            .unwrap_or(false))
    }

    /// Whether the decrement button for this line should be enabled.
    pub fn can_decrement(&self, id: u32) -> Result<bool> {
        Ok(self
            .find(id)?
            .map(|entry| entry.quantity > MIN_QUANTITY)
            .unwrap_or(false))
    }

    pub fn clear(&self) -> Result<()> {
        self.save(Vec::new())
    }

    /// Sum of quantities across all entries.
    pub fn total_items(&self) -> Result<u32> {
        Ok(self.entries()?.iter().map(|entry| entry.quantity).sum())
    }

    pub fn subtotal(&self) -> Result<f64> {
        Ok(self.entries()?.iter().map(|entry| entry.line_total()).sum())
    }

    pub fn summary(&self) -> Result<OrderSummary> {
        let entries = self.entries()?;
        let subtotal: f64 = entries.iter().map(|entry| entry.line_total()).sum();
        let service_fee = subtotal * SERVICE_FEE_RATE;
        Ok(OrderSummary {
            subtotal,
            service_fee,
            processing_fee: PROCESSING_FEE,
            total: subtotal + service_fee + PROCESSING_FEE,
            item_count: entries.iter().map(|entry| entry.quantity).sum(),
        })
    }

    /// Runs the order through the gateway, then empties the cart. Dropping
    /// the future before the gateway resolves leaves the cart untouched.
    pub async fn checkout(&self, gateway: &dyn CheckoutGateway) -> Result<CheckoutReceipt> {
        let order = self.summary()?;
        let receipt = gateway.process(&order).await?;
        self.clear()?;
        info!(confirmation = %receipt.confirmation, total = receipt.total, "checkout complete");
        Ok(receipt)
    }

    fn find(&self, id: u32) -> Result<Option<CartEntry>> {
        Ok(self
            .entries()?
            .into_iter()
            .find(|entry| entry.event.id == id))
    }

    fn save(&self, entries: Vec<CartEntry>) -> Result<()> {
        self.store.set(keys::CART, &serde_json::to_string(&entries)?)?;
        self.bus.publish(ChangeEvent::CartUpdated { entries });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;
    use crate::testutil::test_event;

    fn cart() -> Cart {
        Cart::new(Arc::new(MemoryStore::new()), Arc::new(ChangeBus::default()))
    }

    #[test]
    fn test_duplicate_add_is_refused_and_cart_unchanged() {
        let cart = cart();
        let event = test_event(1, "$299");

        cart.add(&event).unwrap();
        let err = cart.add(&event).unwrap_err();
        assert!(matches!(err, SphereError::AlreadyInCart(1)));

        let entries = cart.entries().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].quantity, 1);
    }

    #[test]
    fn test_quantity_stays_clamped_for_any_delta() {
        let cart = cart();
        cart.add(&test_event(1, "$50")).unwrap();

        assert_eq!(cart.adjust_quantity(1, 500).unwrap(), MAX_QUANTITY);
        assert_eq!(cart.adjust_quantity(1, 3).unwrap(), MAX_QUANTITY);
        assert_eq!(cart.adjust_quantity(1, -500).unwrap(), MIN_QUANTITY);
        assert_eq!(cart.adjust_quantity(1, -1).unwrap(), MIN_QUANTITY);
        assert_eq!(cart.adjust_quantity(1, 4).unwrap(), 5);
    }

    #[test]
    fn test_adjust_quantity_for_unknown_id_is_not_found() {
        let cart = cart();
        assert!(matches!(
            cart.adjust_quantity(9, 1),
            Err(SphereError::NotFound(9))
        ));
    }

    #[test]
    fn test_increment_decrement_permissions_track_the_bounds() {
        let cart = cart();
        cart.add(&test_event(1, "$20")).unwrap();

        // Fresh entry sits at the lower bound.
        assert!(cart.can_increment(1).unwrap());
        assert!(!cart.can_decrement(1).unwrap());

        cart.adjust_quantity(1, 100).unwrap();
        assert!(!cart.can_increment(1).unwrap());
        assert!(cart.can_decrement(1).unwrap());

        // Absent lines have no buttons to enable.
        assert!(!cart.can_increment(2).unwrap());
        assert!(!cart.can_decrement(2).unwrap());
    }

    #[test]
    fn test_total_items_sums_quantities() {
        let cart = cart();
        cart.add(&test_event(1, "$10")).unwrap();
        cart.add(&test_event(2, "$20")).unwrap();
        cart.adjust_quantity(2, 2).unwrap();
        assert_eq!(cart.total_items().unwrap(), 4);
    }

    #[test]
    fn test_summary_applies_both_fees() {
        let cart = cart();
        cart.add(&test_event(1, "$89")).unwrap();
        cart.add(&test_event(2, "$299")).unwrap();
        cart.adjust_quantity(2, 1).unwrap();

        let summary = cart.summary().unwrap();
        let subtotal = 89.0 + 299.0 * 2.0;
        assert!((summary.subtotal - subtotal).abs() < 1e-9);
        assert!((summary.service_fee - subtotal * 0.05).abs() < 1e-9);
        assert_eq!(summary.processing_fee, PROCESSING_FEE);
        assert!(
            (summary.total - (subtotal + subtotal * 0.05 + PROCESSING_FEE)).abs() < 1e-9
        );
        assert_eq!(summary.item_count, 3);
    }

    #[test]
    fn test_remove_and_clear() {
        let cart = cart();
        cart.add(&test_event(1, "$10")).unwrap();
        cart.add(&test_event(2, "$20")).unwrap();

        assert!(cart.remove(1).unwrap());
        assert!(!cart.remove(1).unwrap());
        assert_eq!(cart.entries().unwrap().len(), 1);

        cart.clear().unwrap();
        assert_eq!(cart.total_items().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_mutations_broadcast_cart_snapshots() {
        let bus = Arc::new(ChangeBus::default());
        let cart = Cart::new(Arc::new(MemoryStore::new()), bus.clone());
        let mut updates = bus.subscribe();

        cart.add(&test_event(1, "$10")).unwrap();
        match updates.recv().await.unwrap() {
            ChangeEvent::CartUpdated { entries } => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].event.id, 1);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }
}
