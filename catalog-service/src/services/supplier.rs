use super::entity::EntityService;
use super::images::ImageStore;
use super::repository::{ProductRepository, SupplierRepository};
use crate::models::{Address, Supplier};
use crate::rules::{address_rules, supplier_rules};
use service_core::error::AppError;
use service_core::outcome::Notifier;
use service_core::validation::{RuleSet, Validator};
use std::sync::Arc;

pub const DUPLICATE_DOCUMENT: &str = "a supplier with this document already exists";

/// Supplier rules plus the checks that need the repository: document
/// uniqueness and the nested address. Removing a supplier removes its
/// products and their images.
#[derive(Clone)]
pub struct SupplierService {
    entities: EntityService<Supplier, dyn SupplierRepository>,
    address_rules: Arc<RuleSet<Address>>,
    products: Arc<dyn ProductRepository>,
    images: ImageStore,
}

impl SupplierService {
    pub fn new(
        repository: Arc<dyn SupplierRepository>,
        products: Arc<dyn ProductRepository>,
        images: ImageStore,
    ) -> Self {
        Self {
            entities: EntityService::new(repository, supplier_rules()),
            address_rules: Arc::new(address_rules()),
            products,
            images,
        }
    }

    pub fn repository(&self) -> &Arc<dyn SupplierRepository> {
        self.entities.repository()
    }

    pub async fn add(&self, notifier: &mut Notifier, supplier: &Supplier) -> Result<(), AppError> {
        let supplier_valid = self.entities.validate(notifier, supplier);
        let address_valid = self.validate_address(notifier, &supplier.address);
        if !(supplier_valid && address_valid) {
            return Ok(());
        }

        if self
            .repository()
            .find_by_document(&supplier.document)
            .await?
            .is_some()
        {
            tracing::info!(supplier_id = %supplier.id, "Rejected duplicate supplier document");
            notifier.notify(DUPLICATE_DOCUMENT);
            return Ok(());
        }

        let written = self.entities.add(notifier, supplier).await;
        Self::conflict_as_duplicate(notifier, &supplier.id, written)
    }

    pub async fn update(&self, notifier: &mut Notifier, supplier: &Supplier) -> Result<(), AppError> {
        if !self.entities.validate(notifier, supplier) {
            return Ok(());
        }

        let taken = self
            .repository()
            .find_by_document(&supplier.document)
            .await?
            .is_some_and(|existing| existing.id != supplier.id);
        if taken {
            tracing::info!(supplier_id = %supplier.id, "Rejected duplicate supplier document");
            notifier.notify(DUPLICATE_DOCUMENT);
            return Ok(());
        }

        let written = self.entities.update(notifier, supplier).await;
        Self::conflict_as_duplicate(notifier, &supplier.id, written)
    }

    /// Replace the address of `owner` once it passes the address rules.
    pub async fn update_address(
        &self,
        notifier: &mut Notifier,
        mut owner: Supplier,
        address: Address,
    ) -> Result<(), AppError> {
        if !self.validate_address(notifier, &address) {
            return Ok(());
        }
        owner.address = address;
        self.repository().update(&owner).await?;
        tracing::info!(supplier_id = %owner.id, address_id = %owner.address.id, "Address updated");
        Ok(())
    }

    /// Removes the supplier with its address, its products and their images.
    /// No validation and no existence check.
    pub async fn remove(&self, id: &str) -> Result<(), AppError> {
        for product in self.products.by_supplier(id).await? {
            self.products.remove(&product.id).await?;
            self.images.discard(&product.image).await?;
            tracing::info!(supplier_id = %id, product_id = %product.id, "Removed product of supplier");
        }
        self.entities.remove(id).await
    }

    /// A document taken between the lookup and the write surfaces as a
    /// repository conflict.
    fn conflict_as_duplicate(
        notifier: &mut Notifier,
        supplier_id: &str,
        written: Result<(), AppError>,
    ) -> Result<(), AppError> {
        match written {
            Err(AppError::Conflict(e)) => {
                tracing::info!(supplier_id = %supplier_id, error = %e, "Rejected duplicate supplier document");
                notifier.notify(DUPLICATE_DOCUMENT);
                Ok(())
            }
            other => other,
        }
    }

    fn validate_address(&self, notifier: &mut Notifier, address: &Address) -> bool {
        let result = self.address_rules.validate(address);
        if !result.is_valid() {
            tracing::info!(
                address_id = %address.id,
                violations = result.violations().len(),
                "Address failed business validation"
            );
            result.notify(notifier);
        }
        result.is_valid()
    }
}
