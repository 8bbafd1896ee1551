pub mod identity;
pub mod translation;
pub mod user;
pub mod video;
