//! Role evaluation and navigation guard decisions.
//!
//! Everything here is pure: guards are decided from a [`SessionSnapshot`]
//! and a path, and the callers (extractors and middleware in the services)
//! perform the actual redirects. No decision is ever made while the
//! snapshot is still loading.

use crate::types::identity::Identity;
use crate::types::role::Role;

/// Path the role guard redirects to when no identity is present.
pub const LOGIN_PATH: &str = "/auth/login";

/// Path the role guard redirects to when the role is insufficient.
pub const ROOT_PATH: &str = "/";

/// Path the password-change guard forces veterinarians onto.
pub const CHANGE_PASSWORD_PATH: &str = "/change-password";

/// Path prefixes that stay reachable while a password change is forced.
pub const PUBLIC_PREFIXES: &[&str] = &["/auth", "/register", "/login"];

/// Roles allowed into store-management surfaces.
pub const STAFF_ROLES: &[Role] = &[Role::SuperAdmin, Role::Admin];

/// Roles allowed into clinical surfaces.
pub const CLINICAL_ROLES: &[Role] = &[Role::SuperAdmin, Role::Veterinarian];

/// Read-side view of the session at one instant.
///
/// `loading` is true while the profile bootstrap is in flight; an absent
/// identity in that state means "unknown", not "unauthenticated".
#[derive(Debug, Clone, Default)]
pub struct SessionSnapshot {
    /// Whether the initial session bootstrap is still in flight.
    pub loading: bool,
    /// Whether the session token cookie/signal is present.
    pub token_present: bool,
    /// The authenticated principal, if known.
    pub identity: Option<Identity>,
}

impl SessionSnapshot {
    /// A snapshot with no session at all: not loading, nothing present.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            loading: false,
            token_present: false,
            identity: None,
        }
    }
}

/// Does this identity satisfy any of the required roles?
///
/// False when the identity or its role is absent. Membership is logical OR.
#[must_use]
pub fn has_role(identity: Option<&Identity>, required: &[Role]) -> bool {
    identity
        .and_then(|i| i.role)
        .is_some_and(|role| required.contains(&role))
}

/// Superadmin only.
#[must_use]
pub fn is_superadmin(identity: Option<&Identity>) -> bool {
    has_role(identity, &[Role::SuperAdmin])
}

/// Store staff: superadmin or admin.
#[must_use]
pub fn is_staff(identity: Option<&Identity>) -> bool {
    has_role(identity, STAFF_ROLES)
}

/// Clinical staff: superadmin or veterinarian.
#[must_use]
pub fn is_clinical(identity: Option<&Identity>) -> bool {
    has_role(identity, CLINICAL_ROLES)
}

/// Result of evaluating the role-requirement guard.
///
/// The consuming view renders a pending UI while `is_loading` and must not
/// show protected content until `has_access` is true; `redirect` is the
/// guard's own fire-and-forget navigation, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessCheck {
    /// Session bootstrap still in flight; no decision yet.
    pub is_loading: bool,
    /// Whether the identity satisfies the required roles.
    pub has_access: bool,
    /// Where the guard redirects, if anywhere.
    pub redirect: Option<&'static str>,
}

/// Evaluate the role-requirement guard for a protected view.
///
/// While loading, nothing happens. Once loaded: no identity redirects to
/// the login path, an identity without a required role redirects to the
/// root path, and a satisfying identity grants access.
#[must_use]
pub fn check_role_access(snapshot: &SessionSnapshot, required: &[Role]) -> AccessCheck {
    if snapshot.loading {
        return AccessCheck {
            is_loading: true,
            has_access: false,
            redirect: None,
        };
    }

    let Some(identity) = snapshot.identity.as_ref() else {
        return AccessCheck {
            is_loading: false,
            has_access: false,
            redirect: Some(LOGIN_PATH),
        };
    };

    if has_role(Some(identity), required) {
        AccessCheck {
            is_loading: false,
            has_access: true,
            redirect: None,
        }
    } else {
        AccessCheck {
            is_loading: false,
            has_access: false,
            redirect: Some(ROOT_PATH),
        }
    }
}

/// Whether a path stays reachable while a password change is being forced.
#[must_use]
pub fn is_public_path(path: &str) -> bool {
    path == ROOT_PATH || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p))
}

/// Evaluate the password-change guard for the current navigation.
///
/// Returns the redirect target iff the identity is loaded, flagged for a
/// password change, a veterinarian, and the path is neither public nor the
/// change-password page itself. Idempotent at the target path, so no
/// redirect loop is possible.
#[must_use]
pub fn password_change_redirect(snapshot: &SessionSnapshot, path: &str) -> Option<&'static str> {
    if snapshot.loading {
        return None;
    }

    let identity = snapshot.identity.as_ref()?;
    if !identity.must_change_password {
        return None;
    }
    if identity.role != Some(Role::Veterinarian) {
        return None;
    }
    if is_public_path(path) || path == CHANGE_PASSWORD_PATH {
        return None;
    }

    Some(CHANGE_PASSWORD_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::email::Email;
    use crate::types::id::UserId;

    fn identity(role: Option<Role>) -> Identity {
        Identity {
            id: UserId::new("usr_1"),
            email: Email::parse("who@wagtail.example").expect("valid"),
            name: String::new(),
            address: String::new(),
            phone: String::new(),
            role,
            must_change_password: false,
        }
    }

    fn loaded(identity_value: Option<Identity>) -> SessionSnapshot {
        SessionSnapshot {
            loading: false,
            token_present: identity_value.is_some(),
            identity: identity_value,
        }
    }

    // ------------------------------------------------------------------
    // has_role
    // ------------------------------------------------------------------

    #[test]
    fn has_role_false_without_identity() {
        for required in [&[Role::SuperAdmin][..], STAFF_ROLES, CLINICAL_ROLES] {
            assert!(!has_role(None, required));
        }
    }

    #[test]
    fn has_role_false_without_role_field() {
        let id = identity(None);
        for required in [&[Role::User][..], STAFF_ROLES, CLINICAL_ROLES] {
            assert!(!has_role(Some(&id), required));
        }
    }

    #[test]
    fn has_role_case_insensitive_via_parse() {
        // "ADMIN" on the wire and "admin" required compare equal.
        let id = identity(Role::parse("ADMIN"));
        assert!(has_role(Some(&id), &[Role::Admin]));
    }

    #[test]
    fn has_role_set_membership_is_or() {
        let admin = identity(Some(Role::Admin));
        assert!(has_role(Some(&admin), STAFF_ROLES));

        let user = identity(Some(Role::User));
        assert!(!has_role(Some(&user), STAFF_ROLES));
    }

    #[test]
    fn named_wrappers() {
        let superadmin = identity(Some(Role::SuperAdmin));
        let vet = identity(Some(Role::Veterinarian));
        let shopper = identity(Some(Role::User));

        assert!(is_superadmin(Some(&superadmin)));
        assert!(!is_superadmin(Some(&vet)));

        assert!(is_staff(Some(&superadmin)));
        assert!(!is_staff(Some(&vet)));

        assert!(is_clinical(Some(&vet)));
        assert!(is_clinical(Some(&superadmin)));
        assert!(!is_clinical(Some(&shopper)));
    }

    // ------------------------------------------------------------------
    // Role-requirement guard
    // ------------------------------------------------------------------

    #[test]
    fn role_guard_pending_while_loading() {
        let snapshot = SessionSnapshot {
            loading: true,
            token_present: true,
            identity: None,
        };

        let check = check_role_access(&snapshot, STAFF_ROLES);
        assert!(check.is_loading);
        assert!(!check.has_access);
        assert_eq!(check.redirect, None);
    }

    #[test]
    fn role_guard_redirects_anonymous_to_login() {
        let check = check_role_access(&SessionSnapshot::anonymous(), STAFF_ROLES);
        assert!(!check.is_loading);
        assert!(!check.has_access);
        assert_eq!(check.redirect, Some(LOGIN_PATH));
    }

    #[test]
    fn role_guard_redirects_wrong_role_to_root() {
        let snapshot = loaded(Some(identity(Some(Role::User))));
        let check = check_role_access(&snapshot, STAFF_ROLES);
        assert!(!check.has_access);
        assert_eq!(check.redirect, Some(ROOT_PATH));
    }

    #[test]
    fn role_guard_grants_matching_role() {
        let snapshot = loaded(Some(identity(Some(Role::Admin))));
        let check = check_role_access(&snapshot, STAFF_ROLES);
        assert!(check.has_access);
        assert_eq!(check.redirect, None);
    }

    // ------------------------------------------------------------------
    // Password-change guard
    // ------------------------------------------------------------------

    fn flagged_vet() -> Identity {
        Identity {
            must_change_password: true,
            ..identity(Some(Role::Veterinarian))
        }
    }

    #[test]
    fn password_guard_forces_vet_off_protected_paths() {
        let snapshot = loaded(Some(flagged_vet()));
        assert_eq!(
            password_change_redirect(&snapshot, "/dashboard"),
            Some(CHANGE_PASSWORD_PATH)
        );
        assert_eq!(
            password_change_redirect(&snapshot, "/account"),
            Some(CHANGE_PASSWORD_PATH)
        );
    }

    #[test]
    fn password_guard_is_idempotent_at_target() {
        let snapshot = loaded(Some(flagged_vet()));
        assert_eq!(password_change_redirect(&snapshot, CHANGE_PASSWORD_PATH), None);
    }

    #[test]
    fn password_guard_allows_public_paths() {
        let snapshot = loaded(Some(flagged_vet()));
        for path in ["/", "/auth/login", "/auth/callback", "/register", "/login"] {
            assert_eq!(password_change_redirect(&snapshot, path), None, "{path}");
        }
    }

    #[test]
    fn password_guard_ignores_other_roles() {
        let mut admin = identity(Some(Role::Admin));
        admin.must_change_password = true;
        let snapshot = loaded(Some(admin));
        assert_eq!(password_change_redirect(&snapshot, "/dashboard"), None);
    }

    #[test]
    fn password_guard_ignores_unflagged_vet() {
        let snapshot = loaded(Some(identity(Some(Role::Veterinarian))));
        assert_eq!(password_change_redirect(&snapshot, "/dashboard"), None);
    }

    #[test]
    fn password_guard_waits_for_loading() {
        let snapshot = SessionSnapshot {
            loading: true,
            token_present: true,
            identity: Some(flagged_vet()),
        };
        assert_eq!(password_change_redirect(&snapshot, "/dashboard"), None);
    }
}
