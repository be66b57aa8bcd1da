use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SupplierKind {
    Individual,
    Company,
}

impl SupplierKind {
    /// Digits expected in the supplier's document: taxpayer number for
    /// individuals, company registration number for companies.
    pub fn document_length(self) -> usize {
        match self {
            SupplierKind::Individual => 11,
            SupplierKind::Company => 14,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Address {
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

/// A supplier and its single postal address, stored as one document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub document: String,
    pub kind: SupplierKind,
    pub address: Address,
    pub active: bool,
}
