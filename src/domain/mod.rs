//! Domain types for the translation workflow with strong typing.
//!
//! Newtype wrappers prevent mixing entity IDs, and the fixed enumerations
//! (roles, derived video statuses, known subjects) live here as immutable
//! compiled-in data rather than mutable process state.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unique identifier for a Video in the catalog.
///
/// # Examples
///
/// ```rust
/// use lokarr::domain::VideoId;
///
/// let id = VideoId::new(42);
/// assert_eq!(id.value(), 42);
/// assert_eq!(id.to_string(), "42");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct VideoId(i32);

impl VideoId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        debug_assert!(id >= 0, "VideoId should be non-negative");
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for VideoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<VideoId> for i32 {
    fn from(id: VideoId) -> Self {
        id.0
    }
}

impl From<i32> for VideoId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Unique identifier for a User.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct UserId(i32);

impl UserId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<UserId> for i32 {
    fn from(id: UserId) -> Self {
        id.0
    }
}

impl From<i32> for UserId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// Unique identifier for a Translation record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TranslationId(i32);

impl TranslationId {
    #[must_use]
    pub const fn new(id: i32) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn value(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TranslationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<TranslationId> for i32 {
    fn from(id: TranslationId) -> Self {
        id.0
    }
}

impl From<i32> for TranslationId {
    fn from(id: i32) -> Self {
        Self::new(id)
    }
}

/// User roles, ordered from most to least privileged.
///
/// Every freshly created account is a [`Role::Volunteer`] unless the caller
/// explicitly says otherwise at creation time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Superadmin,
    Admin,
    #[default]
    Volunteer,
}

impl Role {
    pub const ALL: &'static [Self] = &[Self::Superadmin, Self::Admin, Self::Volunteer];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Superadmin => "superadmin",
            Self::Admin => "admin",
            Self::Volunteer => "volunteer",
        }
    }

    /// Staff roles may manage the catalog (starring, imports).
    #[must_use]
    pub const fn is_staff(&self) -> bool {
        matches!(self, Self::Superadmin | Self::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "superadmin" => Ok(Self::Superadmin),
            "admin" => Ok(Self::Admin),
            "volunteer" => Ok(Self::Volunteer),
            other => Err(format!("unknown role: {other}")),
        }
    }
}

/// Derived per-video translation progress.
///
/// Never stored: always recomputed from the video's translation records so
/// it cannot drift out of sync with them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoStatus {
    /// No primary translation record exists yet.
    Untranslated,
    /// At least one primary translation exists, not all of them reviewed.
    Translated,
    /// At least one primary translation exists and every one is reviewed.
    Reviewed,
}

impl VideoStatus {
    /// The fixed status vocabulary, for filter UIs. Not derived from data.
    pub const ALL: &'static [Self] = &[Self::Untranslated, Self::Translated, Self::Reviewed];

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Untranslated => "untranslated",
            Self::Translated => "translated",
            Self::Reviewed => "reviewed",
        }
    }
}

impl fmt::Display for VideoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VideoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "untranslated" => Ok(Self::Untranslated),
            "translated" => Ok(Self::Translated),
            "reviewed" => Ok(Self::Reviewed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// The known subject vocabulary. Imported videos must use one of these.
pub const SUBJECTS: &[&str] = &[
    "Arts",
    "Biology",
    "Chemistry",
    "Computer Science",
    "Economics",
    "History",
    "Mathematics",
    "Physics",
];

#[must_use]
pub fn is_known_subject(subject: &str) -> bool {
    SUBJECTS.contains(&subject)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_id_conversions() {
        let id = VideoId::new(7);
        assert_eq!(id.value(), 7);
        assert_eq!(i32::from(id), 7);
        assert_eq!(VideoId::from(7), id);
        assert_eq!(id.to_string(), "7");
    }

    #[test]
    fn role_round_trips_through_wire_form() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), *role);
        }
        assert!("moderator".parse::<Role>().is_err());
    }

    #[test]
    fn role_defaults_to_volunteer() {
        assert_eq!(Role::default(), Role::Volunteer);
        assert!(!Role::Volunteer.is_staff());
        assert!(Role::Admin.is_staff());
    }

    #[test]
    fn status_vocabulary_is_fixed() {
        assert_eq!(VideoStatus::ALL.len(), 3);
        assert_eq!(
            "translated".parse::<VideoStatus>().unwrap(),
            VideoStatus::Translated
        );
        assert!("approved".parse::<VideoStatus>().is_err());
    }

    #[test]
    fn subject_membership() {
        assert!(is_known_subject("Physics"));
        assert!(!is_known_subject("physics"));
        assert!(!is_known_subject("Alchemy"));
    }
}
