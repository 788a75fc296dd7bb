//! Flock record keeping: the coop roster, the egg log, and care reminders.
//!
//! Each manager is a write-through cache over one key in the shared
//! key-value store. Reads happen once at open; every mutation persists the
//! full collection, the same shape the app has always stored.

mod eggs;
mod model;
mod reminders;
mod roster;

pub use eggs::EggLog;
pub use model::{Chicken, ChickenStatus, EggEntry, Reminder, ReminderInterval};
pub use reminders::ReminderBook;
pub use roster::ChickenRoster;

use crate::error::StoreError;
use crate::store::KvStore;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Stored collections that fail to decode are treated as absent. Losing a
/// corrupt list beats refusing to start.
fn load_list<T: DeserializeOwned>(kv: &dyn KvStore, key: &str) -> Vec<T> {
    let Some(value) = kv.get(key) else {
        return Vec::new();
    };
    match serde_json::from_value(value) {
        Ok(list) => list,
        Err(error) => {
            tracing::warn!(key, %error, "stored records are unreadable; starting empty");
            Vec::new()
        }
    }
}

fn store_list<T: Serialize>(kv: &dyn KvStore, key: &str, items: &[T]) -> Result<(), StoreError> {
    let value = serde_json::to_value(items)?;
    kv.set(key, value)
}
