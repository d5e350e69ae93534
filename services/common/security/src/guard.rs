use tracing::{debug, warn};

use crate::error::SecurityError;
use crate::policy::Decision;
use crate::principal::Principal;
use crate::registry::PolicyRegistry;

/// Rejects the request unless `principal` passes the named policy.
pub fn ensure_policy(
    registry: &PolicyRegistry,
    policy: &str,
    principal: &Principal,
) -> Result<(), SecurityError> {
    match registry.evaluate(policy, principal)? {
        Decision::Allow => {
            debug!(policy, subject = ?principal.subject(), "policy_check_passed");
            Ok(())
        }
        Decision::Deny => {
            warn!(
                policy,
                subject = ?principal.subject(),
                groups = ?principal.groups(),
                "policy_check_failed"
            );
            Err(SecurityError::Forbidden {
                policy: policy.to_owned(),
            })
        }
    }
}
