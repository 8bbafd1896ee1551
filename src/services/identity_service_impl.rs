//! `SeaORM` implementation of the `IdentityService` trait.
//!
//! Resolution is modeled as a small state machine over the identity row so
//! the idempotence and race-retry behavior stay visible: `Linking` (a
//! signed-in user claims the login), `Owned` (returning login), `Unowned`
//! (first contact, or a prior attempt that stopped before linking).

use async_trait::async_trait;
use tracing::{info, warn};

use crate::constants::resolution;
use crate::db::{Identity, Store, is_unique_violation};
use crate::models::user::{placeholder_email, split_full_name};
use crate::models::{NewUser, User};
use crate::services::identity_service::{IdentityError, IdentityService, OauthAssertion};

pub struct SeaOrmIdentityService {
    store: Store,
}

enum ResolutionState {
    /// An already-authenticated user takes precedence over any owner.
    Linking(User),
    /// The identity already points at its canonical user.
    Owned(User),
    /// No owner yet; the target comes from the email or a fresh account.
    Unowned,
}

impl SeaOrmIdentityService {
    #[must_use]
    pub const fn new(store: Store) -> Self {
        Self { store }
    }

    /// Classifies store failures: a unique-constraint violation means a
    /// concurrent resolution won an insert race and the whole procedure is
    /// worth retrying from a fresh read.
    fn classify(err: anyhow::Error, assertion: &OauthAssertion) -> IdentityError {
        if is_unique_violation(&err) {
            IdentityError::Conflict {
                provider: assertion.provider.clone(),
                uid: assertion.uid.clone(),
            }
        } else {
            IdentityError::Database(err.to_string())
        }
    }

    async fn try_resolve(
        &self,
        assertion: &OauthAssertion,
        current_user: Option<&User>,
    ) -> Result<User, IdentityError> {
        let identity = self.find_or_record_identity(assertion).await?;
        let state = self.state_for(&identity, current_user).await?;

        let target = match state {
            ResolutionState::Linking(user) | ResolutionState::Owned(user) => user,
            ResolutionState::Unowned => self.target_from_assertion(assertion).await?,
        };

        // Idempotent: a second resolution for the same (provider, uid,
        // target) finds the owner already set and writes nothing.
        if identity.user_id != Some(target.id) {
            self.store
                .set_identity_user(identity.id, target.id)
                .await
                .map_err(|e| Self::classify(e, assertion))?;
            info!(
                "Linked identity {}/{} to user {}",
                assertion.provider, assertion.uid, target.id
            );
        }

        Ok(target)
    }

    async fn find_or_record_identity(
        &self,
        assertion: &OauthAssertion,
    ) -> Result<Identity, IdentityError> {
        let existing = self
            .store
            .find_identity(&assertion.provider, &assertion.uid)
            .await
            .map_err(|e| Self::classify(e, assertion))?;

        match existing {
            Some(identity) => Ok(identity),
            None => self
                .store
                .create_identity(&assertion.provider, &assertion.uid)
                .await
                .map_err(|e| Self::classify(e, assertion)),
        }
    }

    async fn state_for(
        &self,
        identity: &Identity,
        current_user: Option<&User>,
    ) -> Result<ResolutionState, IdentityError> {
        if let Some(user) = current_user {
            return Ok(ResolutionState::Linking(user.clone()));
        }

        let Some(owner_id) = identity.user_id else {
            return Ok(ResolutionState::Unowned);
        };

        // An owner id pointing at nothing means a prior attempt stopped
        // half-way; resolution proceeds as if unowned and repairs the link.
        match self
            .store
            .get_user(owner_id)
            .await
            .map_err(|e| IdentityError::Database(e.to_string()))?
        {
            Some(user) => Ok(ResolutionState::Owned(user)),
            None => Ok(ResolutionState::Unowned),
        }
    }

    async fn target_from_assertion(
        &self,
        assertion: &OauthAssertion,
    ) -> Result<User, IdentityError> {
        if let Some(email) = assertion.email()
            && let Some(user) = self
                .store
                .find_user_by_email(email)
                .await
                .map_err(|e| IdentityError::Database(e.to_string()))?
        {
            // Merge-by-email: a previously-registered (or placeholder)
            // account is claimed by this external login.
            return Ok(user);
        }

        let (first_name, last_name) = split_full_name(assertion.name());
        let email = assertion.email().map_or_else(
            || placeholder_email(&assertion.uid, &assertion.provider),
            str::to_string,
        );

        let new_user = NewUser {
            email,
            password: crate::db::repositories::user::generate_opaque_password(),
            first_name,
            last_name,
            city: None,
            country: None,
            role: None,
            // Pre-verified by virtue of the external authentication.
            confirmed: true,
        };

        self.store
            .create_user(&new_user)
            .await
            .map_err(|e| Self::classify(e, assertion))
    }
}

#[async_trait]
impl IdentityService for SeaOrmIdentityService {
    async fn resolve_oauth(
        &self,
        assertion: &OauthAssertion,
        current_user: Option<&User>,
    ) -> Result<User, IdentityError> {
        let mut attempt = 0;
        loop {
            match self.try_resolve(assertion, current_user).await {
                Err(IdentityError::Conflict { .. }) if attempt < resolution::CONFLICT_RETRIES => {
                    attempt += 1;
                    warn!(
                        "Insert race for {}/{}, re-reading (attempt {})",
                        assertion.provider, assertion.uid, attempt
                    );
                }
                other => return other,
            }
        }
    }
}
