use super::ClaimRequirement;
use axum::http::Method;

#[derive(Debug, Clone)]
pub struct AccessRule {
    pub method: Method,
    pub route: String,
    pub requirement: ClaimRequirement,
}

/// Declarative table of `(method, route template) → claim requirement`.
///
/// Route templates are the strings registered with the router
/// (`/api/products/:id`), matched against axum's `MatchedPath`. Routes with
/// no entry only need an authenticated caller.
#[derive(Debug, Clone, Default)]
pub struct AccessPolicy {
    rules: Vec<AccessRule>,
}

impl AccessPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn require(
        mut self,
        method: Method,
        route: impl Into<String>,
        resource: &str,
        operation: &str,
    ) -> Self {
        self.rules.push(AccessRule {
            method,
            route: route.into(),
            requirement: ClaimRequirement::new(resource, operation),
        });
        self
    }

    pub fn requirement_for(&self, method: &Method, route: &str) -> Option<&ClaimRequirement> {
        self.rules
            .iter()
            .find(|rule| rule.method == *method && rule.route == route)
            .map(|rule| &rule.requirement)
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}
