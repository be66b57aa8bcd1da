use super::ProductResponse;
use crate::models::{Address, Supplier, SupplierKind};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

fn default_active() -> bool {
    true
}

/// Address as submitted. Text fields default to empty so that missing
/// values reach the business rules instead of failing deserialization.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AddressRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "street is too long"))]
    pub street: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "number is too long"))]
    pub number: String,
    #[serde(default)]
    #[validate(length(max = 250, message = "complement is too long"))]
    pub complement: Option<String>,
    #[serde(default)]
    #[validate(length(max = 20, message = "postal_code is too long"))]
    pub postal_code: String,
    #[serde(default)]
    #[validate(length(max = 250, message = "district is too long"))]
    pub district: String,
    #[serde(default)]
    #[validate(length(max = 250, message = "city is too long"))]
    pub city: String,
    #[serde(default)]
    #[validate(length(max = 100, message = "state is too long"))]
    pub state: String,
}

impl AddressRequest {
    pub fn into_address(self, id: String, supplier_id: String) -> Address {
        Address {
            id,
            supplier_id,
            street: self.street,
            number: self.number,
            complement: self.complement.filter(|c| !c.trim().is_empty()),
            postal_code: self.postal_code,
            district: self.district,
            city: self.city,
            state: self.state,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateSupplierRequest {
    #[serde(default)]
    #[validate(length(max = 500, message = "name is too long"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "document is too long"))]
    pub document: String,
    pub kind: SupplierKind,
    #[validate(nested)]
    pub address: AddressRequest,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl From<CreateSupplierRequest> for Supplier {
    fn from(request: CreateSupplierRequest) -> Self {
        let id = Uuid::new_v4().to_string();
        let address = request
            .address
            .into_address(Uuid::new_v4().to_string(), id.clone());
        Supplier {
            id,
            name: request.name,
            document: request.document,
            kind: request.kind,
            address,
            active: request.active,
        }
    }
}

/// Supplier fields editable through `PUT /api/suppliers/:id`. The address
/// has its own endpoint.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateSupplierRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "name is too long"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 50, message = "document is too long"))]
    pub document: String,
    pub kind: SupplierKind,
    #[serde(default = "default_active")]
    pub active: bool,
}

impl UpdateSupplierRequest {
    pub fn apply_to(self, stored: Supplier) -> Supplier {
        Supplier {
            name: self.name,
            document: self.document,
            kind: self.kind,
            active: self.active,
            ..stored
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddressResponse {
    pub id: String,
    pub supplier_id: String,
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub postal_code: String,
    pub district: String,
    pub city: String,
    pub state: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            id: address.id,
            supplier_id: address.supplier_id,
            street: address.street,
            number: address.number,
            complement: address.complement,
            postal_code: address.postal_code,
            district: address.district,
            city: address.city,
            state: address.state,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupplierResponse {
    pub id: String,
    pub name: String,
    pub document: String,
    pub kind: SupplierKind,
    pub active: bool,
    pub address: AddressResponse,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<Vec<ProductResponse>>,
}

impl From<Supplier> for SupplierResponse {
    fn from(supplier: Supplier) -> Self {
        Self {
            id: supplier.id,
            name: supplier.name,
            document: supplier.document,
            kind: supplier.kind,
            active: supplier.active,
            address: supplier.address.into(),
            products: None,
        }
    }
}
