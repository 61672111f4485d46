use std::collections::HashSet;

use tracing::info;

use crate::common::error::{Result, SphereError};
use crate::domain::{EventRecord, ALL_CATEGORIES};

/// Seed catalog shipped with the crate, mirroring the production event data.
static SEED_EVENTS: &str = include_str!("../../data/events.json");

/// The read-only event catalog for a session.
///
/// Loaded once at session start and never mutated afterwards; every derived
/// view is computed against this fixed ordering.
#[derive(Debug, Clone)]
pub struct Catalog {
    events: Vec<EventRecord>,
}

impl Catalog {
    /// Loads a catalog from a JSON array of event records.
    ///
    /// Price strings are parsed into structured amounts here, at ingestion,
    /// so no query ever re-parses them.
    pub fn from_json(raw: &str) -> Result<Self> {
        let events: Vec<EventRecord> = serde_json::from_str(raw)?;
        if events.is_empty() {
            return Err(SphereError::Config(
                "catalog source contains no events".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for event in &events {
            if !seen.insert(event.id) {
                return Err(SphereError::Invalid {
                    what: "event id",
                    value: event.id.to_string(),
                });
            }
        }
        info!(events = events.len(), "catalog loaded");
        Ok(Self { events })
    }

    /// Loads the embedded seed catalog.
    pub fn builtin() -> Result<Self> {
        Self::from_json(SEED_EVENTS)
    }

    pub fn get_all(&self) -> &[EventRecord] {
        &self.events
    }

    pub fn get_by_id(&self, id: u32) -> Result<&EventRecord> {
        self.events
            .iter()
            .find(|event| event.id == id)
            .ok_or(SphereError::NotFound(id))
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// "All" followed by the distinct categories in catalog order.
    pub fn categories(&self) -> Vec<String> {
        let mut categories = vec![ALL_CATEGORIES.to_string()];
        for event in &self.events {
            if !categories.contains(&event.category) {
                categories.push(event.category.clone());
            }
        }
        categories
    }

    /// Leading slice of the catalog, used for the home page spotlight.
    pub fn featured(&self, count: usize) -> &[EventRecord] {
        &self.events[..count.min(self.events.len())]
    }
}
