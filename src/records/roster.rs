use super::model::Chicken;
use super::{load_list, store_list};
use crate::error::StoreError;
use crate::store::KvStore;
use std::sync::Arc;
use uuid::Uuid;

const CHICKENS_KEY: &str = "chickens";

/// The birds currently (or formerly) in the coop.
pub struct ChickenRoster {
    kv: Arc<dyn KvStore>,
    chickens: Vec<Chicken>,
}

impl ChickenRoster {
    pub fn open(kv: Arc<dyn KvStore>) -> Self {
        let chickens = load_list(kv.as_ref(), CHICKENS_KEY);
        Self { kv, chickens }
    }

    pub fn chickens(&self) -> &[Chicken] {
        &self.chickens
    }

    pub fn add(&mut self, chicken: Chicken) -> Result<(), StoreError> {
        self.chickens.push(chicken);
        self.persist()
    }

    /// Replaces the record with the same id. Returns whether one was found.
    pub fn update(&mut self, chicken: Chicken) -> Result<bool, StoreError> {
        match self.chickens.iter_mut().find(|c| c.id == chicken.id) {
            Some(slot) => {
                *slot = chicken;
                self.persist()?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn remove(&mut self, id: Uuid) -> Result<bool, StoreError> {
        let before = self.chickens.len();
        self.chickens.retain(|c| c.id != id);
        if self.chickens.len() == before {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.chickens.clear();
        self.persist()
    }

    fn persist(&self) -> Result<(), StoreError> {
        store_list(self.kv.as_ref(), CHICKENS_KEY, &self.chickens)
    }
}
