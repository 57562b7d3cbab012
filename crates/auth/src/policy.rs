//! Per-operation role policy.

use std::collections::HashSet;

use gatehouse_core::Role;

/// The set of roles permitted to invoke an operation.
///
/// Declared statically by the caller of the gate, per operation; the core
/// does not own or store policies. Membership is a flat set test: no
/// hierarchy, no inheritance. (If roles ever need inheritance, model it as
/// a precomputed closure over the set, not implicit traversal.)
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RolePolicy {
    permitted: HashSet<Role>,
}

impl RolePolicy {
    pub fn any_of(roles: impl IntoIterator<Item = Role>) -> Self {
        Self {
            permitted: roles.into_iter().collect(),
        }
    }

    pub fn admin_only() -> Self {
        Self::any_of([Role::Admin])
    }

    /// Flat membership test. An explicitly empty policy permits no role;
    /// operations without a role requirement pass *no* policy to the gate
    /// instead.
    pub fn allows(&self, role: Role) -> bool {
        self.permitted.contains(&role)
    }

    pub fn permitted(&self) -> impl Iterator<Item = &Role> {
        self.permitted.iter()
    }
}
