use common_auth::Claims;
use serde::Serialize;
use serde_json::Value;

use crate::groups::MEMBERSHIP_CLAIM_KINDS;

/// A single key-value assertion about a principal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Claim {
    pub kind: String,
    pub value: String,
}

impl Claim {
    pub fn new(kind: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            value: value.into(),
        }
    }
}

/// The authenticated identity plus its claims for one request.
///
/// There are no mutating methods; a principal is fixed once built.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Principal {
    subject: Option<String>,
    claims: Vec<Claim>,
}

impl Principal {
    pub fn new<I>(subject: Option<String>, claims: I) -> Self
    where
        I: IntoIterator<Item = Claim>,
    {
        Self {
            subject,
            claims: claims.into_iter().collect(),
        }
    }

    /// A principal with no identity and no claims.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn claims(&self) -> &[Claim] {
        &self.claims
    }

    pub fn has_claim(&self, kind: &str, value: &str) -> bool {
        self.claims
            .iter()
            .any(|claim| claim.kind == kind && claim.value == value)
    }

    pub fn is_member_of(&self, group: &str) -> bool {
        MEMBERSHIP_CLAIM_KINDS
            .iter()
            .any(|kind| self.has_claim(kind, group))
    }

    /// Group names asserted by any membership claim, in claim order.
    pub fn groups(&self) -> Vec<&str> {
        self.claims
            .iter()
            .filter(|claim| MEMBERSHIP_CLAIM_KINDS.contains(&claim.kind.as_str()))
            .map(|claim| claim.value.as_str())
            .collect()
    }
}

impl From<&Claims> for Principal {
    fn from(value: &Claims) -> Self {
        let claims = match &value.raw {
            Value::Object(map) => map
                .iter()
                .flat_map(|(kind, raw)| flatten(kind, raw))
                .collect(),
            _ => {
                let groups = value.groups.iter().map(|g| Claim::new("groups", g.as_str()));
                let roles = value.roles.iter().map(|r| Claim::new("roles", r.as_str()));
                std::iter::once(Claim::new("sub", value.subject.as_str()))
                    .chain(groups)
                    .chain(roles)
                    .collect()
            }
        };

        Self {
            subject: Some(value.subject.clone()),
            claims,
        }
    }
}

// Scalars become one claim, arrays one claim per scalar element; objects are skipped.
// Membership kinds only take string values, matching `Claims`.
fn flatten(kind: &str, raw: &Value) -> Vec<Claim> {
    if MEMBERSHIP_CLAIM_KINDS.contains(&kind) {
        return match raw {
            Value::String(value) => vec![Claim::new(kind, value.as_str())],
            Value::Array(items) => items
                .iter()
                .filter_map(Value::as_str)
                .map(|value| Claim::new(kind, value))
                .collect(),
            _ => Vec::new(),
        };
    }

    match raw {
        Value::Array(items) => items.iter().filter_map(|item| scalar(kind, item)).collect(),
        other => scalar(kind, other).into_iter().collect(),
    }
}

fn scalar(kind: &str, raw: &Value) -> Option<Claim> {
    match raw {
        Value::String(value) => Some(Claim::new(kind, value.as_str())),
        Value::Bool(value) => Some(Claim::new(kind, value.to_string())),
        Value::Number(value) => Some(Claim::new(kind, value.to_string())),
        _ => None,
    }
}
