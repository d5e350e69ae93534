use std::fmt;
use std::sync::Arc;

use serde::Serialize;

use crate::groups::{GROUP_ADMINS, GROUP_SUPER_USERS};
use crate::principal::Principal;

/// A single condition a principal must satisfy to pass a policy.
///
/// Implementations must be pure: no I/O, no interior mutability.
pub trait Requirement: fmt::Debug + Send + Sync {
    fn is_satisfied_by(&self, principal: &Principal) -> bool;
}

/// Membership of `Admins`, optionally together with `SuperUsers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct AdminRequirement {
    pub require_super: bool,
}

impl AdminRequirement {
    pub const fn new(require_super: bool) -> Self {
        Self { require_super }
    }

    pub const fn admins() -> Self {
        Self::new(false)
    }

    pub const fn super_users() -> Self {
        Self::new(true)
    }
}

impl Requirement for AdminRequirement {
    fn is_satisfied_by(&self, principal: &Principal) -> bool {
        if !principal.is_member_of(GROUP_ADMINS) {
            return false;
        }
        !self.require_super || principal.is_member_of(GROUP_SUPER_USERS)
    }
}

/// Decides whether `principal` satisfies `requirement`.
pub fn evaluate(principal: &Principal, requirement: &AdminRequirement) -> bool {
    requirement.is_satisfied_by(principal)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Decision::Allow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Decision::Allow => "allow",
            Decision::Deny => "deny",
        }
    }
}

impl From<bool> for Decision {
    fn from(value: bool) -> Self {
        if value {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }
}

/// A named rule; every requirement must hold for the policy to allow.
#[derive(Debug, Clone)]
pub struct Policy {
    name: String,
    requirements: Vec<Arc<dyn Requirement>>,
}

impl Policy {
    pub fn new(name: impl Into<String>, requirement: impl Requirement + 'static) -> Self {
        Self {
            name: name.into(),
            requirements: vec![Arc::new(requirement)],
        }
    }

    pub fn and(mut self, requirement: impl Requirement + 'static) -> Self {
        self.requirements.push(Arc::new(requirement));
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn requirements(&self) -> &[Arc<dyn Requirement>] {
        &self.requirements
    }

    pub fn evaluate(&self, principal: &Principal) -> Decision {
        self.requirements
            .iter()
            .all(|requirement| requirement.is_satisfied_by(principal))
            .into()
    }
}
