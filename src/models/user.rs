use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;

use crate::domain::Role;
use crate::entities::users;

/// Prefix of synthesized addresses handed to accounts created from an OAuth
/// assertion that carried no email.
pub const TEMP_EMAIL_PREFIX: &str = "change@me";

static TEMP_EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^change@me").expect("valid regex"));

/// A local account. Password hash never leaves the store layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: i32,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Role,
    pub confirmed: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// False while the address is still a synthesized placeholder.
    #[must_use]
    pub fn email_verified(&self) -> bool {
        !TEMP_EMAIL_RE.is_match(&self.email)
    }

    #[must_use]
    pub fn is_role(&self, role: Role) -> bool {
        self.role == role
    }

    /// Synthetic actor for local CLI operations. Never persisted.
    #[must_use]
    pub fn local_operator() -> Self {
        Self {
            id: 0,
            email: "operator@localhost".to_string(),
            first_name: "Local".to_string(),
            last_name: "Operator".to_string(),
            city: None,
            country: None,
            role: Role::Superadmin,
            confirmed: true,
            created_at: String::new(),
            updated_at: String::new(),
        }
    }
}

impl From<users::Model> for User {
    fn from(model: users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            first_name: model.first_name,
            last_name: model.last_name,
            city: model.city,
            country: model.country,
            role: model.role.parse().unwrap_or_default(),
            confirmed: model.confirmed,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}

/// Fields for creating an account. The plain password is hashed by the
/// repository; `role` falls back to volunteer when not set.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub city: Option<String>,
    pub country: Option<String>,
    pub role: Option<Role>,
    pub confirmed: bool,
}

/// The synthesized address for an OAuth login that carried no email.
#[must_use]
pub fn placeholder_email(uid: &str, provider: &str) -> String {
    format!("{TEMP_EMAIL_PREFIX}-{uid}-{provider}.com")
}

/// Splits a display name on its last space: everything before it is the
/// first name, the remainder (or the whole string when there is no space)
/// is the last name.
#[must_use]
pub fn split_full_name(name: &str) -> (String, String) {
    let name = name.trim();
    match name.rfind(' ') {
        Some(idx) => (
            name[..idx].trim_end().to_string(),
            name[idx + 1..].to_string(),
        ),
        None => (String::new(), name.to_string()),
    }
}

/// Canonical title-case form used for stored names and places: first letter
/// of each word upper-cased, the rest lowered.
#[must_use]
pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            chars.next().map_or_else(String::new, |first| {
                first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_on_last_space() {
        assert_eq!(
            split_full_name("Mary Jane Watson"),
            ("Mary Jane".to_string(), "Watson".to_string())
        );
        assert_eq!(
            split_full_name("Jane Doe"),
            ("Jane".to_string(), "Doe".to_string())
        );
    }

    #[test]
    fn split_without_space_is_all_last_name() {
        assert_eq!(split_full_name("Bo"), (String::new(), "Bo".to_string()));
        assert_eq!(split_full_name(""), (String::new(), String::new()));
    }

    #[test]
    fn placeholder_email_shape() {
        assert_eq!(placeholder_email("2", "x"), "change@me-2-x.com");
    }

    #[test]
    fn placeholder_emails_are_unverified() {
        let user = User {
            id: 1,
            email: placeholder_email("42", "google"),
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            city: None,
            country: None,
            role: Role::Volunteer,
            confirmed: true,
            created_at: String::new(),
            updated_at: String::new(),
        };
        assert!(!user.email_verified());

        let verified = User {
            email: "jane@example.com".to_string(),
            ..user
        };
        assert!(verified.email_verified());
    }

    #[test]
    fn title_case_words() {
        assert_eq!(title_case("mary jane"), "Mary Jane");
        assert_eq!(title_case("SAO PAULO"), "Sao Paulo");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn full_name_joins_parts() {
        let mut user = User::local_operator();
        user.first_name = "Mary Jane".to_string();
        user.last_name = "Watson".to_string();
        assert_eq!(user.full_name(), "Mary Jane Watson");
    }
}
