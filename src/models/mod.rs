pub mod translation;
pub mod user;
pub mod video;

pub use translation::Translation;
pub use user::{NewUser, User};
pub use video::{NewVideo, Video};
