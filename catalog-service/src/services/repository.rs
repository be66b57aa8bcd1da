use crate::models::{Entity, Product, Supplier};
use async_trait::async_trait;
use service_core::error::AppError;

/// Persistence for one entity type.
///
/// `remove` of an unknown id is a no-op; callers that care check existence
/// first. `add` and `update` fail with `AppError::Conflict` when the
/// entity's unique key is held by another record.
#[async_trait]
pub trait Repository<E: Entity>: Send + Sync {
    async fn add(&self, entity: &E) -> Result<(), AppError>;
    async fn update(&self, entity: &E) -> Result<(), AppError>;
    async fn remove(&self, id: &str) -> Result<(), AppError>;
    async fn get_by_id(&self, id: &str) -> Result<Option<E>, AppError>;
    async fn get_all(&self) -> Result<Vec<E>, AppError>;
}

#[async_trait]
pub trait SupplierRepository: Repository<Supplier> {
    async fn find_by_document(&self, document: &str) -> Result<Option<Supplier>, AppError>;
    /// The supplier owning the address with this id.
    async fn find_by_address(&self, address_id: &str) -> Result<Option<Supplier>, AppError>;
}

#[async_trait]
pub trait ProductRepository: Repository<Product> {
    async fn by_supplier(&self, supplier_id: &str) -> Result<Vec<Product>, AppError>;
}
