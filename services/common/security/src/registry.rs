use std::collections::HashMap;

use crate::error::SecurityError;
use crate::groups::{GROUP_ADMINS, GROUP_SUPER_USERS};
use crate::policy::{AdminRequirement, Decision, Policy};
use crate::principal::Principal;

/// Named policies, fixed at startup and shared read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct PolicyRegistry {
    policies: HashMap<String, Policy>,
}

impl PolicyRegistry {
    pub fn builder() -> PolicyRegistryBuilder {
        PolicyRegistryBuilder::default()
    }

    /// `Admins` and `SuperUsers`, both backed by [`AdminRequirement`].
    pub fn standard() -> Self {
        let policies = [
            Policy::new(GROUP_ADMINS, AdminRequirement::admins()),
            Policy::new(GROUP_SUPER_USERS, AdminRequirement::super_users()),
        ]
        .into_iter()
        .map(|policy| (policy.name().to_owned(), policy))
        .collect();
        Self { policies }
    }

    pub fn get(&self, name: &str) -> Option<&Policy> {
        self.policies.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.policies.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names = self.policies.keys().map(String::as_str).collect::<Vec<_>>();
        names.sort_unstable();
        names
    }

    pub fn evaluate(&self, name: &str, principal: &Principal) -> Result<Decision, SecurityError> {
        self.get(name)
            .map(|policy| policy.evaluate(principal))
            .ok_or_else(|| SecurityError::UnknownPolicy(name.to_owned()))
    }
}

#[derive(Debug, Default)]
pub struct PolicyRegistryBuilder {
    pending: Vec<Policy>,
}

impl PolicyRegistryBuilder {
    pub fn add_policy(mut self, policy: Policy) -> Self {
        self.pending.push(policy);
        self
    }

    pub fn build(self) -> Result<PolicyRegistry, SecurityError> {
        let mut policies = HashMap::with_capacity(self.pending.len());
        for policy in self.pending {
            let name = policy.name().to_owned();
            if policies.insert(name.clone(), policy).is_some() {
                return Err(SecurityError::DuplicatePolicy(name));
            }
        }
        Ok(PolicyRegistry { policies })
    }
}
