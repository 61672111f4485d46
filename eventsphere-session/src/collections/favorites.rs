use std::sync::Arc;

use tracing::{debug, info};

use eventsphere_core::{EventRecord, Result};

use crate::notify::{ChangeBus, ChangeEvent};
use crate::store::{keys, KvStore};

/// The favorites list: a persisted set of event snapshots keyed by event id.
///
/// The store holds the authoritative copy; every operation reads it, mutates,
/// writes it back synchronously, and broadcasts the new snapshot.
pub struct Favorites {
    store: Arc<dyn KvStore>,
    bus: Arc<ChangeBus>,
}

impl Favorites {
    pub fn new(store: Arc<dyn KvStore>, bus: Arc<ChangeBus>) -> Self {
        Self { store, bus }
    }

    pub fn all(&self) -> Result<Vec<EventRecord>> {
        super::read_collection(self.store.as_ref(), keys::FAVORITES)
    }

    pub fn contains(&self, id: u32) -> Result<bool> {
        Ok(self.all()?.iter().any(|event| event.id == id))
    }

    /// Adds an event snapshot. Returns false (and changes nothing) if the
    /// event is already favorited.
    pub fn add(&self, event: &EventRecord) -> Result<bool> {
        let mut events = self.all()?;
        if events.iter().any(|fav| fav.id == event.id) {
            debug!(event_id = event.id, "already favorited");
            return Ok(false);
        }
        events.push(event.clone());
        self.save(events)?;
        info!(event_id = event.id, "added to favorites");
        Ok(true)
    }

    /// Removes by id. Returns false if the id was not present; that is a
    /// no-op, not an error.
    pub fn remove(&self, id: u32) -> Result<bool> {
        let mut events = self.all()?;
        let before = events.len();
        events.retain(|event| event.id != id);
        if events.len() == before {
            return Ok(false);
        }
        self.save(events)?;
        info!(event_id = id, "removed from favorites");
        Ok(true)
    }

    /// Card-button behavior: flips membership, returning the new state.
    pub fn toggle(&self, event: &EventRecord) -> Result<bool> {
        if self.contains(event.id)? {
            self.remove(event.id)?;
            Ok(false)
        } else {
            self.add(event)?;
            Ok(true)
        }
    }

    pub fn clear(&self) -> Result<()> {
        self.save(Vec::new())
    }

    pub fn total_count(&self) -> Result<usize> {
        Ok(self.all()?.len())
    }

    fn save(&self, events: Vec<EventRecord>) -> Result<()> {
        self.store
            .set(keys::FAVORITES, &serde_json::to_string(&events)?)?;
        self.bus.publish(ChangeEvent::FavoritesUpdated { events });
        Ok(())
    }
}
