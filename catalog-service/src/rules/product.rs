use crate::models::Product;
use service_core::validation::RuleSet;

pub fn product_rules() -> RuleSet<Product> {
    RuleSet::<Product>::new()
        .required("name", |p| p.name.as_str())
        .length("name", |p| p.name.as_str(), 2, 200)
        .required("description", |p| p.description.as_str())
        .length("description", |p| p.description.as_str(), 2, 1000)
        .rule("price", "The price field must be greater than 0", |p| {
            p.price > 0.0
        })
}
