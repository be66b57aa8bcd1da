use super::entity::EntityService;
use super::images::{ImageStore, ImageUpload};
use super::repository::{ProductRepository, SupplierRepository};
use crate::models::Product;
use crate::rules::product_rules;
use service_core::error::AppError;
use service_core::outcome::Notifier;
use std::sync::Arc;

pub const UNKNOWN_SUPPLIER: &str = "the supplier informed for this product does not exist";

/// Changes a caller may make to a stored product.
#[derive(Debug, Clone)]
pub struct ProductChanges {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub active: bool,
    /// New image: original file name and bytes.
    pub image: Option<(String, ImageUpload)>,
}

/// Products and their images. An image is written only once the product
/// passes every check, and discarded again if persisting it fails.
#[derive(Clone)]
pub struct ProductService {
    entities: EntityService<Product, dyn ProductRepository>,
    suppliers: Arc<dyn SupplierRepository>,
    images: ImageStore,
}

impl ProductService {
    pub fn new(
        repository: Arc<dyn ProductRepository>,
        suppliers: Arc<dyn SupplierRepository>,
        images: ImageStore,
    ) -> Self {
        Self {
            entities: EntityService::new(repository, product_rules()),
            suppliers,
            images,
        }
    }

    pub fn repository(&self) -> &Arc<dyn ProductRepository> {
        self.entities.repository()
    }

    /// Check the product rules, the supplier and the upload together, then
    /// store the image under `product.image` and persist.
    pub async fn add(
        &self,
        notifier: &mut Notifier,
        product: &Product,
        upload: Option<ImageUpload>,
    ) -> Result<(), AppError> {
        let raised = notifier.all().len();
        self.entities.validate(notifier, product);
        if self.suppliers.get_by_id(&product.supplier_id).await?.is_none() {
            notifier.notify(UNKNOWN_SUPPLIER);
        }
        let data = match ImageStore::decode(notifier, upload) {
            Some(data) if notifier.all().len() == raised => data,
            _ => return Ok(()),
        };

        if !self.images.write(notifier, &product.image, data).await? {
            return Ok(());
        }
        if let Err(e) = self.entities.add(notifier, product).await {
            self.discard_after_failure(&product.image).await;
            return Err(e);
        }
        Ok(())
    }

    /// Rebuild `stored` with `changes` applied and re-validate it.
    ///
    /// Returns the product as persisted, or `None` when a notification was
    /// raised and nothing changed.
    pub async fn update(
        &self,
        notifier: &mut Notifier,
        stored: Product,
        changes: ProductChanges,
    ) -> Result<Option<Product>, AppError> {
        let raised = notifier.all().len();
        let mut updated = Product {
            name: changes.name,
            description: changes.description,
            price: changes.price,
            active: changes.active,
            ..stored.clone()
        };
        self.entities.validate(notifier, &updated);
        let replacement = changes.image.and_then(|(original, upload)| {
            ImageStore::decode(notifier, Some(upload))
                .map(|data| (ImageStore::stored_name(&original), data))
        });
        if notifier.all().len() > raised {
            return Ok(None);
        }

        if let Some((name, data)) = replacement {
            if !self.images.write(notifier, &name, data).await? {
                return Ok(None);
            }
            updated.image = name;
        }
        let replaced = updated.image != stored.image;

        if let Err(e) = self.entities.update(notifier, &updated).await {
            if replaced {
                self.discard_after_failure(&updated.image).await;
            }
            return Err(e);
        }
        if replaced {
            self.images.discard(&stored.image).await?;
        }
        Ok(Some(updated))
    }

    /// Remove the product and its image; no validation, no existence check.
    pub async fn remove(&self, id: &str, image: &str) -> Result<(), AppError> {
        self.entities.remove(id).await?;
        self.images.discard(image).await
    }

    async fn discard_after_failure(&self, image: &str) {
        if let Err(e) = self.images.discard(image).await {
            tracing::warn!(image = %image, error = %e, "Failed to discard image of unsaved product");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Address, Supplier, SupplierKind};
    use crate::services::images::{IMAGE_EXISTS, IMAGE_REQUIRED};
    use crate::services::memory::InMemoryRepository;
    use crate::services::repository::Repository;
    use crate::services::storage::LocalStorage;
    use chrono::Utc;
    use uuid::Uuid;

    struct Fixture {
        service: ProductService,
        products: Arc<InMemoryRepository<Product>>,
        images: ImageStore,
        dir: std::path::PathBuf,
    }

    async fn fixture() -> Fixture {
        let dir = std::env::temp_dir().join(format!("catalog-products-{}", Uuid::new_v4()));
        let images = ImageStore::new(Arc::new(LocalStorage::new(&dir).await.unwrap()));
        let products = Arc::new(InMemoryRepository::<Product>::new());
        let suppliers = Arc::new(InMemoryRepository::<Supplier>::new());
        suppliers
            .add(&Supplier {
                id: "s-1".into(),
                name: "Acme".into(),
                document: "52998224725".into(),
                kind: SupplierKind::Individual,
                address: Address {
                    id: "a-1".into(),
                    supplier_id: "s-1".into(),
                    street: "Main Street".into(),
                    number: "1".into(),
                    complement: None,
                    postal_code: "01310100".into(),
                    district: "Downtown".into(),
                    city: "Springfield".into(),
                    state: "SP".into(),
                },
                active: true,
            })
            .await
            .unwrap();

        Fixture {
            service: ProductService::new(products.clone(), suppliers, images.clone()),
            products,
            images,
            dir,
        }
    }

    impl Fixture {
        async fn on_disk(&self, name: &str) -> bool {
            tokio::fs::try_exists(self.dir.join(name)).await.unwrap()
        }
    }

    fn product(image: &str, price: f64) -> Product {
        Product {
            id: Uuid::new_v4().to_string(),
            supplier_id: "s-1".into(),
            name: "Widget".into(),
            description: "A widget".into(),
            image: image.into(),
            price,
            active: true,
            created_at: Utc::now(),
        }
    }

    fn png() -> Option<ImageUpload> {
        Some(ImageUpload::Raw(b"png".to_vec()))
    }

    #[tokio::test]
    async fn upload_onto_existing_name_is_rejected_and_not_persisted() {
        let f = fixture().await;
        let mut notifier = Notifier::new();
        f.images
            .write(&mut notifier, "taken.png", b"png".to_vec())
            .await
            .unwrap();

        f.service
            .add(&mut notifier, &product("taken.png", 10.0), png())
            .await
            .unwrap();

        assert_eq!(notifier.messages(), vec![IMAGE_EXISTS]);
        assert!(f.products.is_empty());
        let _ = tokio::fs::remove_dir_all(f.dir).await;
    }

    #[tokio::test]
    async fn rejected_product_does_not_leave_its_image_behind() {
        let f = fixture().await;
        let mut notifier = Notifier::new();

        f.service
            .add(&mut notifier, &product("cheap.png", 0.0), png())
            .await
            .unwrap();

        assert!(notifier.has_notifications());
        assert!(f.products.is_empty());
        assert!(!f.on_disk("cheap.png").await);
        let _ = tokio::fs::remove_dir_all(f.dir).await;
    }

    #[tokio::test]
    async fn unknown_supplier_is_a_notification() {
        let f = fixture().await;
        let mut notifier = Notifier::new();
        let mut orphan = product("orphan.png", 10.0);
        orphan.supplier_id = "missing".into();

        f.service.add(&mut notifier, &orphan, png()).await.unwrap();

        assert_eq!(notifier.messages(), vec![UNKNOWN_SUPPLIER]);
        assert!(!f.on_disk("orphan.png").await);
        let _ = tokio::fs::remove_dir_all(f.dir).await;
    }

    #[tokio::test]
    async fn unknown_supplier_is_reported_with_every_rule_violation() {
        let f = fixture().await;
        let mut notifier = Notifier::new();
        let mut orphan = product("orphan.png", 0.0);
        orphan.supplier_id = "missing".into();
        orphan.name = String::new();

        f.service.add(&mut notifier, &orphan, None).await.unwrap();

        assert_eq!(
            notifier.messages(),
            vec![
                "The name field is required",
                "The name field must be between 2 and 200 characters",
                "The price field must be greater than 0",
                UNKNOWN_SUPPLIER,
                IMAGE_REQUIRED,
            ]
        );
        assert!(f.products.is_empty());
        assert!(!f.on_disk("orphan.png").await);
        let _ = tokio::fs::remove_dir_all(f.dir).await;
    }

    #[tokio::test]
    async fn update_replaces_image_only_when_uploaded() {
        let f = fixture().await;
        let mut notifier = Notifier::new();
        let original = product("first.png", 10.0);
        f.service.add(&mut notifier, &original, png()).await.unwrap();

        let changes = ProductChanges {
            name: "Widget Pro".into(),
            description: "A better widget".into(),
            price: 12.0,
            active: false,
            image: None,
        };
        let updated = f
            .service
            .update(&mut notifier, original.clone(), changes.clone())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.image, "first.png");
        assert_eq!(updated.created_at, original.created_at);

        let with_image = ProductChanges {
            image: Some(("second.png".into(), ImageUpload::Raw(b"new".to_vec()))),
            ..changes
        };
        let updated = f
            .service
            .update(&mut notifier, updated, with_image)
            .await
            .unwrap()
            .unwrap();

        assert!(updated.image.ends_with("_second.png"));
        assert!(f.on_disk(&updated.image).await);
        assert!(!f.on_disk("first.png").await);
        assert!(!notifier.has_notifications());
        let _ = tokio::fs::remove_dir_all(f.dir).await;
    }

    #[tokio::test]
    async fn invalid_update_discards_new_image() {
        let f = fixture().await;
        let mut notifier = Notifier::new();
        let original = product("keep.png", 10.0);
        f.service.add(&mut notifier, &original, png()).await.unwrap();

        let changes = ProductChanges {
            name: String::new(),
            description: "A widget".into(),
            price: 10.0,
            active: true,
            image: Some(("new.png".into(), ImageUpload::Raw(b"new".to_vec()))),
        };
        let result = f
            .service
            .update(&mut notifier, original.clone(), changes)
            .await
            .unwrap();

        assert!(result.is_none());
        assert!(f.on_disk("keep.png").await);
        let stored = f.products.get_by_id(&original.id).await.unwrap().unwrap();
        assert_eq!(stored.name, "Widget");
        let _ = tokio::fs::remove_dir_all(f.dir).await;
    }
}
