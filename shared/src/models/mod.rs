pub mod admin;
pub mod character;
pub mod chat;
pub mod history;

pub use admin::*;
pub use character::*;
pub use chat::*;
pub use history::*;
