pub mod admin;
pub mod characters;
pub mod chats;

pub use admin::*;
pub use characters::*;
pub use chats::*;
