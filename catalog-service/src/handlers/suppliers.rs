use super::IDS_DO_NOT_MATCH;
use crate::dtos::{
    AddressRequest, AddressResponse, CreateSupplierRequest, ProductResponse, SupplierResponse,
    UpdateSupplierRequest,
};
use crate::models::Supplier;
use crate::startup::AppState;
use axum::extract::{Path, State};
use service_core::error::AppError;
use service_core::outcome::{shape, shape_empty, Notifier, Outcome, Payload, StructuralOutcome};

pub async fn list_suppliers(
    State(state): State<AppState>,
) -> Result<Outcome<Vec<SupplierResponse>>, AppError> {
    let suppliers = state.suppliers.repository().get_all().await?;
    let body = suppliers.into_iter().map(SupplierResponse::from).collect();
    Ok(shape(&StructuralOutcome::Valid, &Notifier::new(), Some(body)))
}

/// Supplier with its address and products.
pub async fn get_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Outcome<SupplierResponse>, AppError> {
    let supplier = match state.suppliers.repository().get_by_id(&id).await? {
        Some(supplier) => {
            let products = state.products.repository().by_supplier(&id).await?;
            let name = supplier.name.clone();
            let mut response = SupplierResponse::from(supplier);
            response.products = Some(
                products
                    .into_iter()
                    .map(|p| ProductResponse::from(p).with_supplier_name(Some(name.clone())))
                    .collect(),
            );
            Some(response)
        }
        None => None,
    };
    Ok(shape(&StructuralOutcome::Valid, &Notifier::new(), supplier))
}

pub async fn create_supplier(
    State(state): State<AppState>,
    Payload { body, structural }: Payload<CreateSupplierRequest>,
) -> Result<Outcome<SupplierResponse>, AppError> {
    let mut notifier = Notifier::new();
    if !structural.is_valid() {
        return Ok(shape(&structural, &notifier, None));
    }

    let supplier = Supplier::from(body);
    state.suppliers.add(&mut notifier, &supplier).await?;

    Ok(shape(&structural, &notifier, Some(SupplierResponse::from(supplier))).created())
}

pub async fn update_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload { body, structural }: Payload<UpdateSupplierRequest>,
) -> Result<Outcome<SupplierResponse>, AppError> {
    let mut notifier = Notifier::new();
    if body.id.as_deref() != Some(id.as_str()) {
        notifier.notify(IDS_DO_NOT_MATCH);
    }
    if !structural.is_valid() || notifier.has_notifications() {
        return Ok(shape(&structural, &notifier, None));
    }

    let Some(stored) = state.suppliers.repository().get_by_id(&id).await? else {
        return Ok(Outcome::NotFound);
    };

    let supplier = body.apply_to(stored);
    state.suppliers.update(&mut notifier, &supplier).await?;

    Ok(shape(&structural, &notifier, Some(SupplierResponse::from(supplier))))
}

pub async fn delete_supplier(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Outcome<()>, AppError> {
    if state.suppliers.repository().get_by_id(&id).await?.is_none() {
        return Ok(Outcome::NotFound);
    }

    state.suppliers.remove(&id).await?;
    Ok(shape_empty(&StructuralOutcome::Valid, &Notifier::new()))
}

pub async fn get_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Outcome<AddressResponse>, AppError> {
    let address = state
        .suppliers
        .repository()
        .find_by_address(&id)
        .await?
        .map(|owner| AddressResponse::from(owner.address));
    Ok(shape(&StructuralOutcome::Valid, &Notifier::new(), address))
}

pub async fn update_address(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Payload { body, structural }: Payload<AddressRequest>,
) -> Result<Outcome<AddressResponse>, AppError> {
    let mut notifier = Notifier::new();
    if body.id.as_deref() != Some(id.as_str()) {
        notifier.notify(IDS_DO_NOT_MATCH);
    }
    if !structural.is_valid() || notifier.has_notifications() {
        return Ok(shape(&structural, &notifier, None));
    }

    let Some(owner) = state.suppliers.repository().find_by_address(&id).await? else {
        return Ok(Outcome::NotFound);
    };

    let address = body.into_address(id, owner.id.clone());
    state
        .suppliers
        .update_address(&mut notifier, owner, address.clone())
        .await?;

    Ok(shape(&structural, &notifier, Some(AddressResponse::from(address))))
}
