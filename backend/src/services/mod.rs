pub mod admin;
pub mod biography;
pub mod chat;
pub mod details;
pub mod persona;
pub mod populate;
pub mod seed;

pub use admin::{AdminError, CharacterAdmin};
pub use biography::{BiographySource, WikipediaClient};
pub use chat::{ChatError, ChatService};
pub use details::DetailGenerator;
pub use persona::PersonaGenerator;
pub use populate::{AutoPopulator, PopulationOutcome};
pub use seed::{SeedReport, seed_characters};
