//! Well-known role name constants.
//!
//! Roles are carried in access tokens; there is no roles table.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_CLINICIAN: &str = "clinician";
pub const ROLE_STAFF: &str = "staff";

/// Roles allowed to browse, compare, and restore revision history.
pub const HISTORY_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_CLINICIAN];

/// Returns `true` if `role` may access revision history.
pub fn can_access_history(role: &str) -> bool {
    HISTORY_ROLES.contains(&role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn elevated_roles_can_access_history() {
        assert!(can_access_history(ROLE_ADMIN));
        assert!(can_access_history(ROLE_CLINICIAN));
    }

    #[test]
    fn staff_and_unknown_roles_cannot_access_history() {
        assert!(!can_access_history(ROLE_STAFF));
        assert!(!can_access_history(""));
        assert!(!can_access_history("Admin"));
    }
}
