pub mod file;
pub mod memory;

pub use file::JsonFileStore;
pub use memory::MemoryStore;

use eventsphere_core::Result;

/// Storage keys for per-session state. Fixed by the persisted layout; the
/// change notifications reference the same names.
pub mod keys {
    pub const FAVORITES: &str = "favorites";
    pub const CART: &str = "cart";
    pub const USER: &str = "user";
}

/// Local key-value storage for one browsing session.
///
/// Values are serialized JSON arrays or objects. Writes complete before the
/// call returns, so a read on the same logical thread immediately after a
/// write always observes that write. Each session owns its storage namespace
/// exclusively.
pub trait KvStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
}
