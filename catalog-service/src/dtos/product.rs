use crate::models::Product;
use serde::{Deserialize, Serialize};
use validator::Validate;

fn default_active() -> bool {
    true
}

/// Product as submitted, either as the JSON body or as the `product` part
/// of a multipart upload.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProductRequest {
    #[serde(default)]
    #[validate(length(min = 1, message = "supplier_id is required"))]
    pub supplier_id: String,
    #[serde(default)]
    #[validate(length(max = 1000, message = "name is too long"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: String,
    /// Original image file name; the stored name gets a unique prefix.
    #[serde(default)]
    #[validate(length(max = 255, message = "image name is too long"))]
    pub image: String,
    /// Base64 image content for JSON uploads.
    #[serde(default)]
    pub image_upload: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Product changes for `PUT /api/products/:id`. The owning supplier is
/// fixed at creation, so any `supplier_id` sent along is ignored.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct UpdateProductRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    #[validate(length(max = 1000, message = "name is too long"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "description is too long"))]
    pub description: String,
    /// Original name of a replacement image; defaults to the current one.
    #[serde(default)]
    #[validate(length(max = 255, message = "image name is too long"))]
    pub image: String,
    #[serde(default)]
    pub image_upload: Option<String>,
    #[serde(default)]
    pub price: f64,
    #[serde(default = "default_active")]
    pub active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: String,
    pub supplier_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier_name: Option<String>,
    pub name: String,
    pub description: String,
    pub image: String,
    pub price: f64,
    pub active: bool,
    pub created_at: String,
}

impl ProductResponse {
    pub fn with_supplier_name(mut self, name: Option<String>) -> Self {
        self.supplier_name = name;
        self
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id,
            supplier_id: product.supplier_id,
            supplier_name: None,
            name: product.name,
            description: product.description,
            image: product.image,
            price: product.price,
            active: product.active,
            created_at: product.created_at.to_rfc3339(),
        }
    }
}
