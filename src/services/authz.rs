//! Authorization seam for actions on catalog data.
//!
//! The policy itself is a pluggable collaborator: callers only depend on the
//! [`Authorizer`] trait and treat a [`Decision::Deny`] as a permission error
//! that stops the action.

use crate::models::{User, Video};

/// An action together with the entity it would affect.
#[derive(Debug, Clone, Copy)]
pub enum Action<'a> {
    Star(&'a Video),
    Import,
    SubmitTranslation(&'a Video),
    Review(&'a Video),
}

impl Action<'_> {
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Star(_) => "star",
            Self::Import => "import",
            Self::SubmitTranslation(_) => "submit_translation",
            Self::Review(_) => "review",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

impl Decision {
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allow)
    }
}

pub trait Authorizer: Send + Sync {
    fn authorize(&self, action: &Action<'_>, actor: &User) -> Decision;
}

/// Default policy: staff roles curate the catalog (starring, imports), any
/// signed-in account may contribute or review translation work.
pub struct RoleAuthorizer;

impl Authorizer for RoleAuthorizer {
    fn authorize(&self, action: &Action<'_>, actor: &User) -> Decision {
        let allowed = match action {
            Action::Star(_) | Action::Import => actor.role.is_staff(),
            Action::SubmitTranslation(_) | Action::Review(_) => true,
        };

        if allowed { Decision::Allow } else { Decision::Deny }
    }
}
