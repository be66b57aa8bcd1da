use super::repository::{ProductRepository, Repository, SupplierRepository};
use crate::models::{Entity, Product, Supplier};
use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::{
    bson::doc,
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::IndexOptions,
    Client as MongoClient, Collection, Database, IndexModel,
};
use serde::{de::DeserializeOwned, Serialize};
use service_core::error::AppError;

#[derive(Clone)]
pub struct MongoDb {
    client: MongoClient,
    db: Database,
}

impl MongoDb {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, AppError> {
        tracing::info!("Connecting to MongoDB");
        let client = MongoClient::with_uri_str(uri).await.map_err(|e| {
            tracing::error!("Failed to connect to MongoDB: {}", e);
            AppError::from(e)
        })?;
        let db = client.database(database);
        tracing::info!(database = %database, "Successfully connected to MongoDB database");
        Ok(Self { client, db })
    }

    pub async fn initialize_indexes(&self) -> Result<(), AppError> {
        tracing::info!("Creating MongoDB indexes for catalog-service");

        let document_index = IndexModel::builder()
            .keys(doc! { "document": 1 })
            .options(
                IndexOptions::builder()
                    .name("supplier_document_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        self.suppliers()
            .create_index(document_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create document index on suppliers: {}", e);
                AppError::from(e)
            })?;

        let address_index = IndexModel::builder()
            .keys(doc! { "address.id": 1 })
            .options(
                IndexOptions::builder()
                    .name("supplier_address_lookup".to_string())
                    .build(),
            )
            .build();
        self.suppliers()
            .create_index(address_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create address index on suppliers: {}", e);
                AppError::from(e)
            })?;

        let supplier_index = IndexModel::builder()
            .keys(doc! { "supplier_id": 1 })
            .options(
                IndexOptions::builder()
                    .name("product_supplier_lookup".to_string())
                    .build(),
            )
            .build();
        self.products()
            .create_index(supplier_index, None)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create supplier index on products: {}", e);
                AppError::from(e)
            })?;

        tracing::info!("MongoDB indexes ready");
        Ok(())
    }

    pub async fn health_check(&self) -> Result<(), AppError> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await
            .map_err(|e| {
                tracing::error!("MongoDB health check failed: {}", e);
                AppError::from(e)
            })?;
        Ok(())
    }

    pub fn suppliers(&self) -> Collection<Supplier> {
        self.db.collection("suppliers")
    }

    pub fn products(&self) -> Collection<Product> {
        self.db.collection("products")
    }
}

const DUPLICATE_KEY: i32 = 11000;

fn is_duplicate_key(err: &MongoError) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(e)) => e.code == DUPLICATE_KEY,
        ErrorKind::Command(e) => e.code == DUPLICATE_KEY,
        _ => false,
    }
}

/// Duplicate-key violations become [`AppError::Conflict`]; anything else is
/// a database fault.
fn write_error<E: Entity>(entity: &E, err: MongoError) -> AppError {
    if is_duplicate_key(&err) {
        tracing::info!(kind = E::KIND, id = %entity.id(), "Write rejected by unique index");
        return AppError::Conflict(anyhow::Error::new(err));
    }
    tracing::error!(kind = E::KIND, id = %entity.id(), "Failed to write: {}", err);
    AppError::from(err)
}

/// A [`Repository`] over one MongoDB collection, keyed by `_id`.
pub struct MongoRepository<E: Send + Sync> {
    collection: Collection<E>,
}

impl<E: Send + Sync> MongoRepository<E> {
    pub fn new(collection: Collection<E>) -> Self {
        Self { collection }
    }

    async fn find_many(&self, filter: mongodb::bson::Document) -> Result<Vec<E>, AppError>
    where
        E: DeserializeOwned + Unpin,
    {
        let cursor = self.collection.find(filter, None).await?;
        Ok(cursor.try_collect().await?)
    }
}

#[async_trait]
impl<E> Repository<E> for MongoRepository<E>
where
    E: Entity + Serialize + DeserializeOwned + Unpin,
{
    async fn add(&self, entity: &E) -> Result<(), AppError> {
        self.collection
            .insert_one(entity, None)
            .await
            .map_err(|e| write_error(entity, e))?;
        tracing::info!(kind = E::KIND, id = %entity.id(), "Inserted entity");
        Ok(())
    }

    async fn update(&self, entity: &E) -> Result<(), AppError> {
        self.collection
            .replace_one(doc! { "_id": entity.id() }, entity, None)
            .await
            .map_err(|e| write_error(entity, e))?;
        tracing::info!(kind = E::KIND, id = %entity.id(), "Replaced entity");
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), AppError> {
        self.collection.delete_one(doc! { "_id": id }, None).await?;
        tracing::info!(kind = E::KIND, id = %id, "Deleted entity");
        Ok(())
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<E>, AppError> {
        Ok(self.collection.find_one(doc! { "_id": id }, None).await?)
    }

    async fn get_all(&self) -> Result<Vec<E>, AppError> {
        self.find_many(doc! {}).await
    }
}

#[async_trait]
impl SupplierRepository for MongoRepository<Supplier> {
    async fn find_by_document(&self, document: &str) -> Result<Option<Supplier>, AppError> {
        Ok(self
            .collection
            .find_one(doc! { "document": document }, None)
            .await?)
    }

    async fn find_by_address(&self, address_id: &str) -> Result<Option<Supplier>, AppError> {
        Ok(self
            .collection
            .find_one(doc! { "address.id": address_id }, None)
            .await?)
    }
}

#[async_trait]
impl ProductRepository for MongoRepository<Product> {
    async fn by_supplier(&self, supplier_id: &str) -> Result<Vec<Product>, AppError> {
        self.find_many(doc! { "supplier_id": supplier_id }).await
    }
}
