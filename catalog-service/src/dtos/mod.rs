pub mod product;
pub mod supplier;

pub use product::{ProductRequest, ProductResponse, UpdateProductRequest};
pub use supplier::{
    AddressRequest, AddressResponse, CreateSupplierRequest, SupplierResponse,
    UpdateSupplierRequest,
};
