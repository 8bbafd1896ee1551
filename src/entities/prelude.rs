pub use super::identities::Entity as Identities;
pub use super::translations::Entity as Translations;
pub use super::users::Entity as Users;
pub use super::videos::Entity as Videos;
