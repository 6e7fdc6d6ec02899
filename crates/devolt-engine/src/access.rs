//! Caller authorization.
//!
//! The caller of an input is its `msg_sender`, or the depositor for portal
//! deposits. A caller missing from the user directory is rejected with the
//! directory's own lookup failure.

use devolt_types::{Address, DevoltError, Result, Role, User};
use tracing::warn;

use crate::repository::UserRepository;

pub struct AccessGuard;

impl AccessGuard {
    /// Resolve the caller's directory entry.
    pub fn resolve<R: UserRepository>(repo: &R, caller: Address) -> Result<User> {
        repo.find_user(caller).map_err(|err| match err {
            DevoltError::UserNotFound(address) => DevoltError::unknown_caller(address),
            other => other,
        })
    }

    /// Require the caller to hold one of `roles`.
    pub fn require<R: UserRepository>(
        repo: &R,
        caller: Address,
        roles: &[Role],
        action: &str,
    ) -> Result<User> {
        let user = Self::resolve(repo, caller)?;
        if roles.contains(&user.role) {
            return Ok(user);
        }
        warn!(caller = %caller, role = %user.role, action, "Caller lacks the required role");
        Err(DevoltError::Unauthorized {
            reason: format!("user {caller} with role {} cannot {action}", user.role),
        })
    }

    pub fn require_admin<R: UserRepository>(
        repo: &R,
        caller: Address,
        action: &str,
    ) -> Result<User> {
        Self::require(repo, caller, &[Role::Admin], action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MemoryStore;

    fn store() -> MemoryStore {
        let mut store = MemoryStore::new();
        store
            .insert_user(User::new(Address::from_low_u8(1), Role::Admin))
            .unwrap();
        store
            .insert_user(User::new(Address::from_low_u8(2), Role::User))
            .unwrap();
        store
    }

    #[test]
    fn unknown_caller_surfaces_directory_miss() {
        let err = AccessGuard::resolve(&store(), Address::from_low_u8(9)).unwrap_err();
        let msg = err.to_string();
        assert!(matches!(err, DevoltError::Unauthorized { .. }));
        assert!(msg.contains("failed to find user by address"));
        assert!(msg.contains("record not found"));
    }

    #[test]
    fn admin_passes_user_fails() {
        let store = store();
        let admin = Address::from_low_u8(1);
        let user = Address::from_low_u8(2);
        assert!(AccessGuard::require_admin(&store, admin, "createAuction").is_ok());
        let err = AccessGuard::require_admin(&store, user, "createAuction").unwrap_err();
        assert!(err.to_string().contains("cannot createAuction"));
    }

    #[test]
    fn any_of_several_roles() {
        let store = store();
        let roles = [Role::Admin, Role::User];
        assert!(AccessGuard::require(&store, Address::from_low_u8(2), &roles, "withdraw").is_ok());
    }
}
