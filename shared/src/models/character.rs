use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: Uuid,
    pub name: String,
    pub era: String,
    pub birth_date: String,
    pub death_date: String,
    pub nationality: String,
    pub occupation: String,
    pub description: String,
    /// Used verbatim as the system prompt when chatting with this character
    pub persona: String,
    pub major_achievements: String,
    pub historical_context: String,
    pub famous_quotes: String,
    /// Set once the persona came out of the auto-population pipeline
    pub auto_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Character {
    /// A blank character carrying only a name
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: name.into(),
            era: String::new(),
            birth_date: String::new(),
            death_date: String::new(),
            nationality: String::new(),
            occupation: String::new(),
            description: String::new(),
            persona: String::new(),
            major_achievements: String::new(),
            historical_context: String::new(),
            famous_quotes: String::new(),
            auto_generated: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    /// Snapshot of the biography fields, with empty strings reported as absent
    pub fn fields(&self) -> CharacterFields {
        fn known(value: &str) -> Option<String> {
            (!value.is_empty()).then(|| value.to_string())
        }

        CharacterFields {
            era: known(&self.era),
            birth_date: known(&self.birth_date),
            death_date: known(&self.death_date),
            nationality: known(&self.nationality),
            occupation: known(&self.occupation),
            description: known(&self.description),
            major_achievements: known(&self.major_achievements),
            historical_context: known(&self.historical_context),
            famous_quotes: known(&self.famous_quotes),
        }
    }

    /// Overwrite attributes with every present, non-empty value in `fields`.
    /// Returns true when at least one attribute was written.
    pub fn merge(&mut self, fields: &CharacterFields) -> bool {
        let mut written = false;
        for (slot, value) in [
            (&mut self.era, &fields.era),
            (&mut self.birth_date, &fields.birth_date),
            (&mut self.death_date, &fields.death_date),
            (&mut self.nationality, &fields.nationality),
            (&mut self.occupation, &fields.occupation),
            (&mut self.description, &fields.description),
            (&mut self.major_achievements, &fields.major_achievements),
            (&mut self.historical_context, &fields.historical_context),
            (&mut self.famous_quotes, &fields.famous_quotes),
        ] {
            if let Some(value) = value
                && !value.is_empty()
            {
                *slot = value.clone();
                written = true;
            }
        }
        written
    }

    /// Overwrite attributes with every present value in `fields`, empty ones included
    pub fn assign(&mut self, fields: &CharacterFields) {
        for (slot, value) in [
            (&mut self.era, &fields.era),
            (&mut self.birth_date, &fields.birth_date),
            (&mut self.death_date, &fields.death_date),
            (&mut self.nationality, &fields.nationality),
            (&mut self.occupation, &fields.occupation),
            (&mut self.description, &fields.description),
            (&mut self.major_achievements, &fields.major_achievements),
            (&mut self.historical_context, &fields.historical_context),
            (&mut self.famous_quotes, &fields.famous_quotes),
        ] {
            if let Some(value) = value {
                *slot = value.clone();
            }
        }
    }

    /// Copy with a fresh identity, named "<name> (Copy)"
    pub fn duplicate(&self) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            name: format!("{} (Copy)", self.name),
            created_at: now,
            updated_at: now,
            ..self.clone()
        }
    }
}

/// Biography fields that may or may not be known for a character.
/// `None` means the field was not found; it never overwrites anything.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CharacterFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub era: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nationality: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub occupation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_achievements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub historical_context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub famous_quotes: Option<String>,
}

impl CharacterFields {
    /// True when no field carries a non-empty value
    pub fn is_empty(&self) -> bool {
        [
            &self.era,
            &self.birth_date,
            &self.death_date,
            &self.nationality,
            &self.occupation,
            &self.description,
            &self.major_achievements,
            &self.historical_context,
            &self.famous_quotes,
        ]
        .into_iter()
        .all(|value| value.as_deref().is_none_or(str::is_empty))
    }
}

/// Public listing entry for `GET /api/characters/`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CharacterSummary {
    pub id: Uuid,
    pub name: String,
    pub era: String,
    pub description: String,
}

impl From<&Character> for CharacterSummary {
    fn from(character: &Character) -> Self {
        Self {
            id: character.id,
            name: character.name.clone(),
            era: character.era.clone(),
            description: character.description.clone(),
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct CharacterList {
    pub characters: Vec<CharacterSummary>,
    pub total_count: usize,
}

// Request payloads
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct CreateCharacterRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub persona: String,
    #[serde(flatten)]
    pub fields: CharacterFields,
}

/// Admin edit. Present fields replace the stored value, empty strings included.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct UpdateCharacterRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub persona: Option<String>,
    #[serde(flatten)]
    pub fields: CharacterFields,
}
