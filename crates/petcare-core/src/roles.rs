//! Capability tier for UI branching. Grants nothing; the server decides access.

use std::collections::BTreeSet;

/// Role labels that select the administrative dashboard. Matched exactly.
pub const ADMIN_ROLES: [&str; 2] = ["ROLE_ADMIN", "ADMIN"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CapabilityTier {
    Standard,
    Administrative,
}

impl CapabilityTier {
    #[inline]
    pub fn is_admin(self) -> bool {
        self == CapabilityTier::Administrative
    }
}

pub fn resolve(roles: &BTreeSet<String>) -> CapabilityTier {
    if ADMIN_ROLES.iter().any(|admin| roles.contains(*admin)) {
        CapabilityTier::Administrative
    } else {
        CapabilityTier::Standard
    }
}
