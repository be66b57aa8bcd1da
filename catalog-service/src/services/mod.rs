pub mod database;
pub mod entity;
pub mod images;
pub mod memory;
pub mod product;
pub mod repository;
pub mod storage;
pub mod supplier;

pub use database::{MongoDb, MongoRepository};
pub use entity::EntityService;
pub use images::{ImageStore, ImageUpload};
pub use memory::InMemoryRepository;
pub use product::{ProductChanges, ProductService};
pub use repository::{ProductRepository, Repository, SupplierRepository};
pub use storage::{LocalStorage, Storage};
pub use supplier::SupplierService;
