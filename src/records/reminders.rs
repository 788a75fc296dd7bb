use super::model::Reminder;
use super::{load_list, store_list};
use crate::error::StoreError;
use crate::store::KvStore;
use std::sync::Arc;
use uuid::Uuid;

const REMINDERS_KEY: &str = "reminders";

/// Care reminders, completed ones included.
pub struct ReminderBook {
    kv: Arc<dyn KvStore>,
    reminders: Vec<Reminder>,
}

impl ReminderBook {
    pub fn open(kv: Arc<dyn KvStore>) -> Self {
        let reminders = load_list(kv.as_ref(), REMINDERS_KEY);
        Self { kv, reminders }
    }

    pub fn reminders(&self) -> &[Reminder] {
        &self.reminders
    }

    pub fn pending_count(&self) -> usize {
        self.reminders.iter().filter(|r| !r.completed).count()
    }

    pub fn add(&mut self, reminder: Reminder) -> Result<(), StoreError> {
        self.reminders.push(reminder);
        self.persist()
    }

    pub fn update(&mut self, reminder: Reminder) -> Result<bool, StoreError> {
        match self.reminders.iter_mut().find(|r| r.id == reminder.id) {
            Some(slot) => {
                *slot = reminder;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn set_completed(&mut self, id: Uuid, completed: bool) -> Result<bool, StoreError> {
        match self.reminders.iter_mut().find(|r| r.id == id) {
            Some(reminder) => {
                reminder.completed = completed;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.reminders.len();
        self.reminders.retain(|r| r.id != id);
        if self.reminders.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.reminders.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        store_list(self.kv.as_ref(), REMINDERS_KEY, &self.reminders)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::ReminderInterval;
    use crate::store::MemoryStore;

    #[test]
    fn completing_a_reminder_persists() {
        let kv = Arc::new(MemoryStore::new());
        let mut book = ReminderBook::open(kv.clone());
        let reminder = Reminder::new("Refill water", ReminderInterval::EveryDay);
        let id = reminder.id;
        book.add(reminder).expect("add");
        assert_eq!(book.pending_count(), 1);

        assert!(book.set_completed(id, true).expect("complete"));
        assert_eq!(book.pending_count(), 0);

        let reopened = ReminderBook::open(kv);
        assert!(reopened.reminders()[0].completed);
    }

    #[test]
    fn unknown_ids_are_reported_not_errors() {
        let mut book = ReminderBook::open(Arc::new(MemoryStore::new()));
        let ghost = Reminder::new("never added", ReminderInterval::EveryHour);
        assert!(!book.update(ghost.clone()).expect("update"));
        assert!(!book.set_completed(ghost.id, true).expect("complete"));
        assert!(!book.remove(ghost.id).expect("remove"));
    }

    #[test]
    fn clear_leaves_an_empty_book() {
        let kv = Arc::new(MemoryStore::new());
        let mut book = ReminderBook::open(kv.clone());
        book.add(Reminder::new("Clean the coop", ReminderInterval::Every3Days))
            .expect("add");
        book.clear().expect("clear");

        assert!(ReminderBook::open(kv).reminders().is_empty());
    }
}
