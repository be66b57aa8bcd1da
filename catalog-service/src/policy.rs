//! Which claim each protected route demands. Routes not listed here only
//! need an authenticated caller.

use axum::http::Method;
use service_core::auth::AccessPolicy;

pub const SUPPLIER: &str = "Supplier";
pub const PRODUCT: &str = "Product";

pub fn access_policy() -> AccessPolicy {
    AccessPolicy::new()
        .require(Method::POST, "/api/suppliers", SUPPLIER, "Create")
        .require(Method::PUT, "/api/suppliers/:id", SUPPLIER, "Update")
        .require(Method::DELETE, "/api/suppliers/:id", SUPPLIER, "Delete")
        .require(Method::PUT, "/api/suppliers/address/:id", SUPPLIER, "Update")
        .require(Method::POST, "/api/products", PRODUCT, "Create")
        .require(Method::POST, "/api/products/upload", PRODUCT, "Create")
        .require(Method::PUT, "/api/products/:id", PRODUCT, "Update")
        .require(Method::DELETE, "/api/products/:id", PRODUCT, "Delete")
}

#[cfg(test)]
mod tests {
    use super::*;
    use service_core::auth::ClaimRequirement;

    #[test]
    fn writes_are_protected_and_reads_are_not() {
        let policy = access_policy();

        assert_eq!(
            policy.requirement_for(&Method::DELETE, "/api/products/:id"),
            Some(&ClaimRequirement::new(PRODUCT, "Delete"))
        );
        assert_eq!(
            policy.requirement_for(&Method::PUT, "/api/suppliers/address/:id"),
            Some(&ClaimRequirement::new(SUPPLIER, "Update"))
        );
        assert!(policy.requirement_for(&Method::GET, "/api/products/:id").is_none());
        assert!(policy.requirement_for(&Method::GET, "/api/suppliers").is_none());
    }

    #[test]
    fn every_write_route_has_exactly_one_rule() {
        let policy = access_policy();
        let mut keys: Vec<_> = policy
            .rules()
            .iter()
            .map(|r| (r.method.to_string(), r.route.clone()))
            .collect();
        let total = keys.len();
        keys.sort();
        keys.dedup();
        assert_eq!(keys.len(), total);
        assert_eq!(total, 8);
    }
}
