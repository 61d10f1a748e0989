use super::character::Character;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Characters selected for a batch admin action
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct BatchRequest {
    pub ids: Vec<Uuid>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct BatchReport {
    pub succeeded: usize,
    pub failed: usize,
    #[serde(default)]
    pub errors: Vec<String>,
}

impl BatchReport {
    pub fn success(&mut self) {
        self.succeeded += 1;
    }

    pub fn failure(&mut self, error: Option<String>) {
        self.failed += 1;
        if let Some(error) = error {
            self.errors.push(error);
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CreatedCharacter {
    pub character: Character,
    /// Whether the auto-population pipeline filled in the new record
    pub auto_populated: bool,
}
