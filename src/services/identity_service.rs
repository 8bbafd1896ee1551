//! Domain service mapping an external OAuth assertion onto exactly one
//! local account.
//!
//! Handles returning logins, account linking while signed in, claiming a
//! previously-registered account by email, and first-contact registration
//! with a placeholder email when the provider supplies none.

use serde::Deserialize;
use thiserror::Error;

use crate::models::User;

/// Errors specific to identity resolution.
#[derive(Debug, Error)]
pub enum IdentityError {
    /// A concurrent resolution for the same login won an insert race twice.
    #[error("Conflicting concurrent sign-in for {provider}/{uid}")]
    Conflict { provider: String, uid: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// The provider callback payload: `{provider, uid, info: {email?, name?}}`.
#[derive(Debug, Clone, Deserialize)]
pub struct OauthAssertion {
    pub provider: String,
    pub uid: String,
    #[serde(default)]
    pub info: OauthInfo,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OauthInfo {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl OauthAssertion {
    /// The asserted email, with empty strings treated as absent.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        self.info.email.as_deref().filter(|e| !e.is_empty())
    }

    /// The asserted display name, possibly empty.
    #[must_use]
    pub fn name(&self) -> &str {
        self.info.name.as_deref().unwrap_or_default()
    }
}

#[async_trait::async_trait]
pub trait IdentityService: Send + Sync {
    /// Resolves the assertion to its canonical local user, creating and
    /// linking records as needed.
    ///
    /// Resolution is idempotent: repeating a call with identical input
    /// returns the same user and performs no further writes. A signed-in
    /// `current_user` takes precedence over every other way of picking the
    /// target (the account-linking flow).
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::Conflict`] when a concurrent resolution for
    /// the same login keeps winning insert races after a retry; any other
    /// persistence failure is fatal to the callback.
    async fn resolve_oauth(
        &self,
        assertion: &OauthAssertion,
        current_user: Option<&User>,
    ) -> Result<User, IdentityError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_assertion_email_counts_as_absent() {
        let assertion = OauthAssertion {
            provider: "x".to_string(),
            uid: "1".to_string(),
            info: OauthInfo {
                email: Some(String::new()),
                name: None,
            },
        };
        assert_eq!(assertion.email(), None);
        assert_eq!(assertion.name(), "");
    }

    #[test]
    fn assertion_deserializes_without_info() {
        let assertion: OauthAssertion =
            serde_json::from_str(r#"{"provider":"google","uid":"42"}"#).unwrap();
        assert_eq!(assertion.provider, "google");
        assert_eq!(assertion.email(), None);
    }
}
