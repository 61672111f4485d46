mod cart;
mod favorites;

pub use cart::{Cart, OrderSummary, PROCESSING_FEE, SERVICE_FEE_RATE};
pub use favorites::Favorites;

use serde::de::DeserializeOwned;
use tracing::warn;

use eventsphere_core::Result;

use crate::store::KvStore;

/// Reads a stored collection, defaulting to empty on a missing or corrupt key.
fn read_collection<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> Result<Vec<T>> {
    match store.get(key)? {
        None => Ok(Vec::new()),
        Some(raw) => match serde_json::from_str(&raw) {
            Ok(items) => Ok(items),
            Err(err) => {
                warn!(key, %err, "corrupt stored collection, starting empty");
                Ok(Vec::new())
            }
        },
    }
}
