pub mod prelude;

pub mod identities;
pub mod translations;
pub mod users;
pub mod videos;
