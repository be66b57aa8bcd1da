//! Bearer-token authentication and claims-based authorization.
mod claims;
mod gate;
mod jwt;
mod middleware;
mod policy;

pub use claims::{CallerIdentity, Claim, ClaimEntry, ClaimRequirement, TokenClaims};
pub use gate::{AuthorizationGate, GateState};
pub use jwt::JwtService;
pub use middleware::{authenticate, authorize};
pub use policy::{AccessPolicy, AccessRule};
