use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A granted (resource, operation) permission, e.g. `("Product", "Delete")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Claim {
    pub resource: String,
    pub operation: String,
}

impl Claim {
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
        }
    }
}

/// The claim a protected operation demands. Declared statically per route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimRequirement {
    pub resource: String,
    pub operation: String,
}

impl ClaimRequirement {
    pub fn new(resource: impl Into<String>, operation: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            operation: operation.into(),
        }
    }

    /// Exact pair match; no wildcards, no prefix matching.
    pub fn is_met_by(&self, claims: &HashSet<Claim>) -> bool {
        claims
            .iter()
            .any(|c| c.resource == self.resource && c.operation == self.operation)
    }
}

/// Claim as carried inside the token: one entry per resource with a
/// comma-separated list of operations, `{"type":"Supplier","value":"Create,Update"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimEntry {
    #[serde(rename = "type")]
    pub kind: String,
    pub value: String,
}

/// JWT payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (user ID)
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub iss: String,
    pub aud: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    #[serde(default)]
    pub claims: Vec<ClaimEntry>,
}

/// Who is calling, and what they may do. Read-only for the duration of a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerIdentity {
    pub id: String,
    pub email: Option<String>,
    pub claims: HashSet<Claim>,
}

impl CallerIdentity {
    pub fn holds(&self, requirement: &ClaimRequirement) -> bool {
        requirement.is_met_by(&self.claims)
    }
}

impl From<TokenClaims> for CallerIdentity {
    fn from(token: TokenClaims) -> Self {
        let claims = token
            .claims
            .iter()
            .flat_map(|entry| {
                entry
                    .value
                    .split(',')
                    .map(str::trim)
                    .filter(|op| !op.is_empty())
                    .map(|op| Claim::new(entry.kind.clone(), op))
                    .collect::<Vec<_>>()
            })
            .collect();

        Self {
            id: token.sub,
            email: token.email,
            claims,
        }
    }
}
