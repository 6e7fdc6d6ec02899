//! User directory maintenance.

use devolt_types::{Address, DevoltError, Outputs, Result, Role, User};
use tracing::info;

use crate::repository::UserRepository;

pub struct UserDirectory;

impl UserDirectory {
    pub fn create<R: UserRepository>(
        repo: &mut R,
        address: Address,
        role: Role,
    ) -> Result<Outputs> {
        if address.is_zero() {
            return Err(DevoltError::InvalidUser {
                reason: "address must not be the zero address".to_string(),
            });
        }
        repo.insert_user(User::new(address, role))?;
        info!(%address, %role, "User created");
        Ok(Outputs::notice(format!(
            "created user with address: {address} and role: {role}"
        )))
    }

    pub fn update<R: UserRepository>(
        repo: &mut R,
        address: Address,
        role: Role,
    ) -> Result<Outputs> {
        let mut user = repo.find_user(address)?;
        user.role = role;
        repo.update_user(user)?;
        info!(%address, %role, "User updated");
        Ok(Outputs::notice(format!(
            "updated user with address: {address} and role: {role}"
        )))
    }

    pub fn delete<R: UserRepository>(repo: &mut R, address: Address) -> Result<Outputs> {
        repo.delete_user(address)?;
        info!(%address, "User deleted");
        Ok(Outputs::notice(format!("deleted user with address: {address}")))
    }
}
