use super::document;
use crate::models::{Address, Supplier, SupplierKind};
use service_core::validation::RuleSet;

pub fn supplier_rules() -> RuleSet<Supplier> {
    RuleSet::<Supplier>::new()
        .required("name", |s| s.name.as_str())
        .length("name", |s| s.name.as_str(), 2, 100)
        .required("document", |s| s.document.as_str())
        .rule(
            "document",
            "The document field must have 11 digits for individuals",
            |s| s.kind != SupplierKind::Individual || s.document.chars().count() == 11,
        )
        .rule(
            "document",
            "The document field must have 14 digits for companies",
            |s| s.kind != SupplierKind::Company || s.document.chars().count() == 14,
        )
        .rule(
            "document",
            "The document field is not a valid document number",
            |s| document::is_valid(&s.document, s.kind),
        )
}

pub fn address_rules() -> RuleSet<Address> {
    RuleSet::<Address>::new()
        .required("street", |a| a.street.as_str())
        .length("street", |a| a.street.as_str(), 2, 200)
        .required("number", |a| a.number.as_str())
        .length("number", |a| a.number.as_str(), 1, 50)
        .rule(
            "postal_code",
            "The postal_code field must have exactly 8 digits",
            |a| a.postal_code.len() == 8 && a.postal_code.chars().all(|c| c.is_ascii_digit()),
        )
        .required("district", |a| a.district.as_str())
        .length("district", |a| a.district.as_str(), 2, 100)
        .required("city", |a| a.city.as_str())
        .length("city", |a| a.city.as_str(), 2, 100)
        .required("state", |a| a.state.as_str())
        .length("state", |a| a.state.as_str(), 2, 50)
}
