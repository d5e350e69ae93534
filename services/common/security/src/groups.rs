pub const GROUP_ADMINS: &str = "Admins";
pub const GROUP_SUPER_USERS: &str = "SuperUsers";

/// Claim kinds that express group membership. Values compare exactly.
pub const MEMBERSHIP_CLAIM_KINDS: &[&str] = &["groups", "group", "roles", "role"];
