pub mod product;
pub mod supplier;

pub use product::Product;
pub use supplier::{Address, Supplier, SupplierKind};

/// A persisted catalog entity, addressed by its string id.
pub trait Entity: Send + Sync + 'static {
    /// Name used in logs and collection naming.
    const KIND: &'static str;

    fn id(&self) -> &str;

    /// Value no two records of this kind may share.
    fn unique_key(&self) -> Option<&str> {
        None
    }
}

impl Entity for Supplier {
    const KIND: &'static str = "supplier";

    fn id(&self) -> &str {
        &self.id
    }

    fn unique_key(&self) -> Option<&str> {
        Some(&self.document)
    }
}

impl Entity for Product {
    const KIND: &'static str = "product";

    fn id(&self) -> &str {
        &self.id
    }
}
