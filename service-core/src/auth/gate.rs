use super::{Claim, ClaimRequirement};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateState {
    Pending,
    Granted,
    Denied,
}

/// Per-request authorization decision.
///
/// Starts `Pending` and moves once to `Granted` or `Denied`. A new gate is
/// built for every request; nothing is cached, since claims may be revoked
/// between requests.
#[derive(Debug)]
pub struct AuthorizationGate {
    state: GateState,
}

impl Default for AuthorizationGate {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorizationGate {
    pub fn new() -> Self {
        Self {
            state: GateState::Pending,
        }
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    /// Evaluate the requirement against the caller's claims.
    ///
    /// Only the first evaluation transitions; later calls return the terminal
    /// state unchanged.
    pub fn check(&mut self, requirement: &ClaimRequirement, claims: &HashSet<Claim>) -> GateState {
        if self.state == GateState::Pending {
            self.state = if requirement.is_met_by(claims) {
                GateState::Granted
            } else {
                GateState::Denied
            };
        }
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(pairs: &[(&str, &str)]) -> HashSet<Claim> {
        pairs.iter().map(|(r, o)| Claim::new(*r, *o)).collect()
    }

    #[test]
    fn starts_pending() {
        assert_eq!(AuthorizationGate::new().state(), GateState::Pending);
    }

    #[test]
    fn grants_exact_pair() {
        let mut gate = AuthorizationGate::new();
        let state = gate.check(
            &ClaimRequirement::new("Supplier", "Create"),
            &claims(&[("Supplier", "Create")]),
        );
        assert_eq!(state, GateState::Granted);
    }

    #[test]
    fn denies_other_operation_on_same_resource() {
        let mut gate = AuthorizationGate::new();
        let state = gate.check(
            &ClaimRequirement::new("Product", "Delete"),
            &claims(&[("Product", "Create"), ("Supplier", "Delete")]),
        );
        assert_eq!(state, GateState::Denied);
    }

    #[test]
    fn denies_empty_claim_set() {
        let mut gate = AuthorizationGate::new();
        let state = gate.check(&ClaimRequirement::new("Product", "Delete"), &HashSet::new());
        assert_eq!(state, GateState::Denied);
    }

    #[test]
    fn terminal_state_does_not_change() {
        let requirement = ClaimRequirement::new("Product", "Update");
        let mut gate = AuthorizationGate::new();

        assert_eq!(gate.check(&requirement, &HashSet::new()), GateState::Denied);
        assert_eq!(
            gate.check(&requirement, &claims(&[("Product", "Update")])),
            GateState::Denied
        );
    }
}
