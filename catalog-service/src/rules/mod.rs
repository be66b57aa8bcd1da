//! Business rule sets, one per catalog entity.
//!
//! Each rule set is built once at startup and shared; rules are pure and
//! run in declaration order.

pub mod document;
mod product;
mod supplier;

pub use product::product_rules;
pub use supplier::{address_rules, supplier_rules};
