use super::model::EggEntry;
use super::{load_list, store_list};
use crate::error::StoreError;
use crate::store::KvStore;
use std::sync::Arc;

const ENTRIES_KEY: &str = "egg_entries";
const NOTES_KEY: &str = "egg_notes";

/// Collection log plus free-form notes, persisted under separate keys.
pub struct EggLog {
    kv: Arc<dyn KvStore>,
    entries: Vec<EggEntry>,
    notes: Vec<String>,
}

impl EggLog {
    pub fn open(kv: Arc<dyn KvStore>) -> Self {
        let entries = load_list(kv.as_ref(), ENTRIES_KEY);
        let notes = load_list(kv.as_ref(), NOTES_KEY);
        Self { kv, entries, notes }
    }

    pub fn entries(&self) -> &[EggEntry] {
        &self.entries
    }

    pub fn notes(&self) -> &[String] {
        &self.notes
    }

    pub fn add_entry(&mut self, entry: EggEntry) -> Result<(), StoreError> {
        self.entries.push(entry);
        store_list(self.kv.as_ref(), ENTRIES_KEY, &self.entries)
    }

    pub fn add_note(&mut self, note: impl Into<String>) -> Result<(), StoreError> {
        self.notes.push(note.into());
        store_list(self.kv.as_ref(), NOTES_KEY, &self.notes)
    }

    /// Eggs collected across every entry.
    pub fn total_quantity(&self) -> u64 {
        self.entries.iter().map(|e| u64::from(e.quantity)).sum()
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.entries.clear();
        self.notes.clear();
        store_list(self.kv.as_ref(), ENTRIES_KEY, &self.entries)?;
        store_list(self.kv.as_ref(), NOTES_KEY, &self.notes)
    }
}
