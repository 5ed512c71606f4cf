//! Startup creation of the administrative account.

use tracing::{info, warn};
use uuid::Uuid;

use common::{AppError, AppResult, BootstrapConfig};
use domain::{CredentialHasher, Filter, NewUser, ROLE_ADMIN};
use identity_store_lib::UserRepository;

/// Result of [`ensure_admin`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapOutcome {
    Created(Uuid),
    AlreadyPresent,
    /// No admin credentials configured
    Skipped,
}

/// Create the configured admin account unless one with that email exists.
///
/// The account is verified, of type `organization` and holds only the
/// `Admin` role. Running it again is a no-op.
pub async fn ensure_admin(
    users: &dyn UserRepository,
    hasher: &dyn CredentialHasher,
    config: &BootstrapConfig,
    hash_cost: u32,
) -> AppResult<BootstrapOutcome> {
    let (Some(email), Some(password)) = (&config.admin_email, &config.admin_password) else {
        warn!("SUPER_USER or SUPER_USER_PASSWORD not set, skipping admin bootstrap");
        return Ok(BootstrapOutcome::Skipped);
    };

    if users.count(Filter::by_email(email)).await? > 0 {
        info!("Admin account already present");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let admin = NewUser::employee(email.as_str(), hasher.hash(password, hash_cost)?)
        .with_roles([ROLE_ADMIN])
        .verified();

    match users.create(admin).await {
        Ok(user) => {
            info!(user_id = %user.id, "Admin account created");
            Ok(BootstrapOutcome::Created(user.id))
        }
        // Another instance won the race
        Err(AppError::Conflict(_)) => Ok(BootstrapOutcome::AlreadyPresent),
        Err(e) => Err(e),
    }
}
