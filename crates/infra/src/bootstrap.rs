//! First-run administrator account.

use hbnb_core::{DomainResult, User, UserId};

use crate::Facade;

/// Account details for the bootstrap administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminSeed {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created(UserId),
    /// A user with the seed email was already present; it is left untouched.
    AlreadyExists(UserId),
}

impl BootstrapOutcome {
    pub fn user_id(&self) -> UserId {
        match self {
            BootstrapOutcome::Created(id) | BootstrapOutcome::AlreadyExists(id) => *id,
        }
    }
}

/// Create the administrator described by `seed` unless its email is taken.
pub fn ensure_admin(facade: &Facade, seed: &AdminSeed) -> DomainResult<BootstrapOutcome> {
    if let Some(existing) = facade.find_user_by_email(&seed.email) {
        tracing::info!(user_id = %existing.id, "bootstrap admin already exists");
        return Ok(BootstrapOutcome::AlreadyExists(existing.id));
    }

    let admin = User::new(
        UserId::new(),
        seed.email.trim(),
        seed.first_name.as_str(),
        seed.last_name.as_str(),
    )?
    .with_admin(true);
    let id = admin.id;
    facade.insert_user(admin);

    tracing::info!(user_id = %id, "bootstrap admin created");
    Ok(BootstrapOutcome::Created(id))
}
