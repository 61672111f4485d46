use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::info;

use eventsphere_core::{query, Catalog, EventRecord, QueryParams};

use crate::account::Account;
use crate::collections::{Cart, Favorites};
use crate::config::AppConfig;
use crate::notify::{ChangeBus, ChangeEvent};
use crate::store::KvStore;

/// One browsing session: the catalog plus every stateful service wired to a
/// single store and change bus. Constructed once at startup and dropped at
/// session end; nothing else touches the storage keys directly.
pub struct Session {
    catalog: Catalog,
    bus: Arc<ChangeBus>,
    favorites: Favorites,
    cart: Cart,
    account: Account,
}

impl Session {
    pub fn new(catalog: Catalog, store: Arc<dyn KvStore>, config: &AppConfig) -> Self {
        let bus = Arc::new(ChangeBus::default());
        let favorites = Favorites::new(store.clone(), bus.clone());
        let cart = Cart::new(store.clone(), bus.clone());
        let account = Account::new(
            store,
            Duration::from_millis(config.simulation.login_delay_ms),
            Duration::from_millis(config.simulation.signup_delay_ms),
        );
        info!(events = catalog.len(), "session started");
        Self {
            catalog,
            bus,
            favorites,
            cart,
            account,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn favorites(&self) -> &Favorites {
        &self.favorites
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    /// Derived view of the catalog for the current filters.
    pub fn query(&self, params: &QueryParams) -> Vec<&EventRecord> {
        query::query(&self.catalog, params)
    }

    /// Badge counters and open views subscribe here.
    pub fn subscribe(&self) -> broadcast::Receiver<ChangeEvent> {
        self.bus.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn session() -> Session {
        Session::new(
            Catalog::builtin().unwrap(),
            Arc::new(MemoryStore::new()),
            &AppConfig::default(),
        )
    }

    #[test]
    fn test_services_share_one_store() {
        let session = session();
        let event = session.catalog().get_by_id(2).unwrap().clone();

        session.favorites().add(&event).unwrap();
        session.cart().add(&event).unwrap();

        assert!(session.favorites().contains(2).unwrap());
        assert!(session.cart().contains(2).unwrap());
    }

    #[tokio::test]
    async fn test_badge_counter_sees_both_collections() {
        let session = session();
        let mut updates = session.subscribe();
        let event = session.catalog().get_by_id(1).unwrap().clone();

        session.cart().add(&event).unwrap();
        session.favorites().add(&event).unwrap();

        let kinds = [
            updates.recv().await.unwrap().kind(),
            updates.recv().await.unwrap().kind(),
        ];
        assert_eq!(kinds, ["cartUpdated", "favoritesUpdated"]);
    }

    #[test]
    fn test_query_delegates_to_the_engine() {
        let session = session();
        let params = QueryParams::from_query_string("search=music&category=Music");
        let view = session.query(&params);
        assert_eq!(view.len(), 1);
        assert_eq!(view[0].name, "Music Vibes Night");
    }
}
