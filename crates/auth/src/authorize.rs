use crate::{catalog, permissions, AuthError, Identity, Permission, Role};

/// Whether `identity` holds `permission`.
///
/// Grant sources, in the order they are consulted:
/// 1. a direct permission grant on the identity,
/// 2. any held role whose catalog entry includes the permission,
/// 3. the `system_admin` override, held directly or through a role.
///
/// An inactive identity holds nothing, whatever is granted on paper.
///
/// - No IO
/// - No panics
/// - No business logic (pure policy check)
pub fn identity_has_permission(identity: &Identity, permission: &Permission) -> bool {
    if !identity.active {
        return false;
    }

    if identity.permissions.contains(permission) {
        return true;
    }

    if identity
        .roles
        .iter()
        .any(|role| catalog::role_has_permission(role, permission))
    {
        return true;
    }

    holds_system_admin(identity)
}

/// Whether `identity` satisfies a role requirement.
///
/// Passes when the held roles intersect `required`, or when the identity
/// holds the admin role (admin passes every role gate). An inactive identity
/// satisfies nothing.
pub fn identity_has_role(identity: &Identity, required: &[Role]) -> bool {
    if !identity.active {
        return false;
    }

    if identity.roles.iter().any(|role| required.contains(role)) {
        return true;
    }

    identity.roles.iter().any(Role::is_admin)
}

/// Permission gate with the denial mapped onto the error taxonomy: inactive
/// identities fail with [`AuthError::IdentityInactive`] before any grant is
/// consulted, everything else missing is [`AuthError::Forbidden`].
pub fn require_permission(identity: &Identity, permission: &Permission) -> Result<(), AuthError> {
    if !identity.active {
        return Err(AuthError::IdentityInactive);
    }

    if identity_has_permission(identity, permission) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// Role gate counterpart of [`require_permission`].
pub fn require_role(identity: &Identity, required: &[Role]) -> Result<(), AuthError> {
    if !identity.active {
        return Err(AuthError::IdentityInactive);
    }

    if identity_has_role(identity, required) {
        Ok(())
    } else {
        Err(AuthError::Forbidden)
    }
}

/// `system_admin` granted directly or carried by any held role.
fn holds_system_admin(identity: &Identity) -> bool {
    identity.permissions.iter().any(Permission::is_system_admin)
        || identity
            .roles
            .iter()
            .any(|role| catalog::role_has_permission(role, &permissions::SYSTEM_ADMIN))
}
