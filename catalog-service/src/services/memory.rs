use super::repository::{ProductRepository, Repository, SupplierRepository};
use crate::models::{Entity, Product, Supplier};
use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};
use service_core::error::AppError;
use std::sync::Arc;

/// In-process store used for local development and tests.
///
/// Unique keys are claimed in a side index before the entity is written, so
/// two concurrent writers of the same key cannot both succeed.
pub struct InMemoryRepository<E> {
    entries: Arc<DashMap<String, E>>,
    unique: Arc<DashMap<String, String>>,
}

impl<E> Default for InMemoryRepository<E> {
    fn default() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            unique: Arc::new(DashMap::new()),
        }
    }
}

impl<E> InMemoryRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<E: Entity> InMemoryRepository<E> {
    fn claim(&self, entity: &E) -> Result<(), AppError> {
        let Some(key) = entity.unique_key() else {
            return Ok(());
        };
        match self.unique.entry(key.to_string()) {
            Entry::Occupied(owner) if owner.get() != entity.id() => {
                Err(AppError::Conflict(anyhow::anyhow!(
                    "{} {} already holds key {}",
                    E::KIND,
                    owner.get(),
                    key
                )))
            }
            Entry::Occupied(_) => Ok(()),
            Entry::Vacant(slot) => {
                slot.insert(entity.id().to_string());
                Ok(())
            }
        }
    }

    fn release(&self, key: &str, id: &str) {
        self.unique.remove_if(key, |_, owner| owner == id);
    }
}

#[async_trait]
impl<E: Entity + Clone> Repository<E> for InMemoryRepository<E> {
    async fn add(&self, entity: &E) -> Result<(), AppError> {
        self.claim(entity)?;
        self.entries.insert(entity.id().to_string(), entity.clone());
        tracing::debug!(kind = E::KIND, id = %entity.id(), "Stored entity in memory");
        Ok(())
    }

    async fn update(&self, entity: &E) -> Result<(), AppError> {
        self.claim(entity)?;
        let previous = self.entries.insert(entity.id().to_string(), entity.clone());
        if let Some(old_key) = previous.as_ref().and_then(|p| p.unique_key()) {
            if Some(old_key) != entity.unique_key() {
                self.release(old_key, entity.id());
            }
        }
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        if let Some((_, removed)) = self.entries.remove(id) {
            if let Some(key) = removed.unique_key() {
                self.release(key, id);
            }
        }
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<E>, AppError> {
        Ok(self.entries.get(id).map(|entry| entry.value().clone()))
    }

    async fn get_all(&self) -> Result<Vec<E>, AppError> {
        Ok(self.entries.iter().map(|entry| entry.value().clone()).collect())
    }
}

#[async_trait]
impl SupplierRepository for InMemoryRepository<Supplier> {
    async fn find_by_document(&self, document: &str) -> Result<Option<Supplier>, AppError> {
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.document == document)
            .map(|entry| entry.value().clone()))
    }

    async fn find_by_address(&self, address_id: &str) -> Result<Option<Supplier>, AppError> {
        Ok(self
            .entries
            .iter()
            .find(|entry| entry.address.id == address_id)
            .map(|entry| entry.value().clone()))
    }
}

#[async_trait]
impl ProductRepository for InMemoryRepository<Product> {
    async fn by_supplier(&self, supplier_id: &str) -> Result<Vec<Product>, AppError> {
        Ok(self
            .entries
            .iter()
            .filter(|entry| entry.supplier_id == supplier_id)
            .map(|entry| entry.value().clone())
            .collect())
    }
}
