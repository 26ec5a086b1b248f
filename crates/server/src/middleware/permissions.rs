//! # Permission Checks
//!
//! Handler-side permission helpers over the static role map. Roles travel
//! in the JWT, so checks are pure and need no database round trip.

use ::auth::Permission;
use entity::users::Role;
use error::Result;

use crate::middleware::auth::AuthenticatedUser;

/// Check that the authenticated user's role carries a permission.
pub fn check_permission(user: &AuthenticatedUser, permission: Permission) -> Result<()> {
    ::auth::require_permission(user.role, permission)
}

/// Check that the user is an officer (admin, rt, rw, or bendahara).
///
/// Officer-only flows that have no finer-grained permission use this.
pub fn require_officer(user: &AuthenticatedUser) -> Result<()> {
    if user.role.is_officer() {
        Ok(())
    }
    else {
        Err(error::AppError::forbidden(format!(
            "Role '{}' is not a community officer",
            user.role
        )))
    }
}

/// Check that the user is an administrator.
pub fn require_admin(user: &AuthenticatedUser) -> Result<()> {
    if user.role == Role::Admin {
        Ok(())
    }
    else {
        Err(error::AppError::forbidden("Administrator role required"))
    }
}

#[cfg(test)]
mod tests {
    use ::auth::permissions::DuesAction;

    use super::*;

    fn user_with_role(role: Role) -> AuthenticatedUser {
        AuthenticatedUser {
            id: "usr_test".to_string(),
            email: "test@rt05.id".to_string(),
            role,
        }
    }

    #[test]
    fn test_check_permission() {
        let bendahara = user_with_role(Role::Bendahara);
        assert!(check_permission(&bendahara, Permission::Dues(DuesAction::Confirm)).is_ok());

        let warga = user_with_role(Role::Warga);
        assert!(check_permission(&warga, Permission::Dues(DuesAction::Confirm)).is_err());
    }

    #[test]
    fn test_require_officer() {
        assert!(require_officer(&user_with_role(Role::Rt)).is_ok());
        assert!(require_officer(&user_with_role(Role::Bendahara)).is_ok());
        assert!(require_officer(&user_with_role(Role::Sekretaris)).is_err());
        assert!(require_officer(&user_with_role(Role::Warga)).is_err());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&user_with_role(Role::Admin)).is_ok());
        assert!(require_admin(&user_with_role(Role::Rw)).is_err());
    }
}
