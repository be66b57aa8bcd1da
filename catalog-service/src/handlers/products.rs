use super::IDS_DO_NOT_MATCH;
use crate::dtos::{ProductRequest, ProductResponse, UpdateProductRequest};
use crate::models::Product;
use crate::services::{ImageStore, ImageUpload, ProductChanges};
use crate::startup::AppState;
use axum::extract::{Multipart, Path, State};
use chrono::Utc;
use service_core::error::AppError;
use service_core::outcome::{shape, Notifier, Outcome, Payload, StructuralOutcome};
use std::collections::HashMap;
use uuid::Uuid;
use validator::Validate;

pub async fn list_products(
    State(state): State<AppState>,
) -> Result<Outcome<Vec<ProductResponse>>, AppError> {
    let names: HashMap<String, String> = state
        .suppliers
        .repository()
        .get_all()
        .await?
        .into_iter()
        .map(|s| (s.id, s.name))
        .collect();

    let products = state.products.repository().get_all().await?;
    let body = products
        .into_iter()
        .map(|p| {
            let name = names.get(&p.supplier_id).cloned();
            ProductResponse::from(p).with_supplier_name(name)
        })
        .collect();

    Ok(shape(&StructuralOutcome::Valid, &Notifier::new(), Some(body)))
}

pub async fn get_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Outcome<ProductResponse>, AppError> {
    let product = match state.products.repository().get_by_id(&id).await? {
        Some(product) => {
            let supplier = state
                .suppliers
                .repository()
                .get_by_id(&product.supplier_id)
                .await?;
            Some(ProductResponse::from(product).with_supplier_name(supplier.map(|s| s.name)))
        }
        None => None,
    };
    Ok(shape(&StructuralOutcome::Valid, &Notifier::new(), product))
}

/// JSON body with the image as base64 in `image_upload`.
pub async fn create_product(
    State(state): State<AppState>,
    Payload { body, structural }: Payload<ProductRequest>,
) -> Result<Outcome<ProductResponse>, AppError> {
    let upload = body.image_upload.clone().map(ImageUpload::Base64);
    register_product(&state, structural, body, upload).await
}

/// Multipart form: a `product` part holding the JSON fields and an `image`
/// file part.
pub async fn upload_product(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Outcome<ProductResponse>, AppError> {
    let mut request: Option<ProductRequest> = None;
    let mut image: Option<(Option<String>, Vec<u8>)> = None;
    let mut errors = Vec::new();

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                errors.push(format!("multipart body is malformed: {}", e.body_text()));
                break;
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("product") => match field.text().await {
                Ok(text) => match serde_json::from_str::<ProductRequest>(&text) {
                    Ok(parsed) => request = Some(parsed),
                    Err(e) => errors.push(format!("product part is not valid JSON: {}", e)),
                },
                Err(e) => errors.push(format!("product part could not be read: {}", e.body_text())),
            },
            Some("image") => {
                let file_name = field.file_name().map(str::to_string);
                match field.bytes().await {
                    Ok(bytes) => image = Some((file_name, bytes.to_vec())),
                    Err(e) => errors.push(format!("image part could not be read: {}", e.body_text())),
                }
            }
            other => tracing::debug!(field = ?other, "Ignoring unexpected multipart field"),
        }
    }

    let mut request = match request {
        Some(request) if errors.is_empty() => request,
        _ => {
            if errors.is_empty() {
                errors.push("the product part is required".to_string());
            }
            tracing::info!(errors = errors.len(), "Rejected malformed product upload");
            let structural = StructuralOutcome::invalid(errors);
            return Ok(shape(&structural, &Notifier::new(), None));
        }
    };

    let structural = StructuralOutcome::from(request.validate());
    let upload = image.map(|(file_name, bytes)| {
        if let Some(file_name) = file_name.filter(|n| !n.is_empty()) {
            request.image = file_name;
        }
        ImageUpload::Raw(bytes)
    });

    register_product(&state, structural, request, upload).await
}

async fn register_product(
    state: &AppState,
    structural: StructuralOutcome,
    request: ProductRequest,
    upload: Option<ImageUpload>,
) -> Result<Outcome<ProductResponse>, AppError> {
    let mut notifier = Notifier::new();
    if !structural.is_valid() {
        return Ok(shape(&structural, &notifier, None));
    }

    let product = Product {
        id: Uuid::new_v4().to_string(),
        supplier_id: request.supplier_id,
        name: request.name,
        description: request.description,
        image: ImageStore::stored_name(&request.image),
        price: request.price,
        active: request.active,
        created_at: Utc::now(),
    };
    state.products.add(&mut notifier, &product, upload).await?;

    Ok(shape(&structural, &notifier, Some(ProductResponse::from(product))).created())
}

pub async fn update_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload { body, structural }: Payload<UpdateProductRequest>,
) -> Result<Outcome<ProductResponse>, AppError> {
    let mut notifier = Notifier::new();
    if body.id.as_deref() != Some(id.as_str()) {
        notifier.notify(IDS_DO_NOT_MATCH);
    }
    if !structural.is_valid() || notifier.has_notifications() {
        return Ok(shape(&structural, &notifier, None));
    }

    let Some(stored) = state.products.repository().get_by_id(&id).await? else {
        return Ok(Outcome::NotFound);
    };

    let image = body
        .image_upload
        .filter(|encoded| !encoded.trim().is_empty())
        .map(|encoded| {
            let original = if body.image.is_empty() {
                stored.image.clone()
            } else {
                body.image.clone()
            };
            (original, ImageUpload::Base64(encoded))
        });
    let changes = ProductChanges {
        name: body.name,
        description: body.description,
        price: body.price,
        active: body.active,
        image,
    };

    let updated = state.products.update(&mut notifier, stored, changes).await?;
    Ok(shape(&structural, &notifier, updated.map(ProductResponse::from)))
}

/// Returns the removed product.
pub async fn delete_product(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Outcome<ProductResponse>, AppError> {
    let Some(stored) = state.products.repository().get_by_id(&id).await? else {
        return Ok(Outcome::NotFound);
    };

    state.products.remove(&id, &stored.image).await?;
    Ok(shape(
        &StructuralOutcome::Valid,
        &Notifier::new(),
        Some(ProductResponse::from(stored)),
    ))
}
