//! Claims-based authorization for the admin portal.
//!
//! The core is a pure predicate: [`evaluate`] decides whether a
//! [`Principal`] satisfies an [`AdminRequirement`]. Everything else here
//! names and registers policies built from that predicate, and turns a
//! deny into a rejection for HTTP handlers.

pub mod error;
pub mod groups;
pub mod guard;
pub mod policy;
pub mod principal;
pub mod registry;

pub use error::SecurityError;
pub use groups::{GROUP_ADMINS, GROUP_SUPER_USERS, MEMBERSHIP_CLAIM_KINDS};
pub use guard::ensure_policy;
pub use policy::{evaluate, AdminRequirement, Decision, Policy, Requirement};
pub use principal::{Claim, Principal};
pub use registry::{PolicyRegistry, PolicyRegistryBuilder};
