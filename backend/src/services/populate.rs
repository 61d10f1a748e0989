use crate::llm::LanguageModel;
use crate::services::biography::BiographySource;
use crate::services::details::DetailGenerator;
use crate::services::persona::PersonaGenerator;
use shared::models::Character;
use std::sync::Arc;

/// Result of one pipeline run. Nothing has been persisted yet.
#[derive(Clone, Debug, PartialEq)]
pub struct PopulationOutcome {
    pub character: Character,
    pub biography: bool,
    pub persona: bool,
    pub details: bool,
}

impl PopulationOutcome {
    /// True when at least one step produced usable data
    pub fn succeeded(&self) -> bool {
        self.biography || self.persona || self.details
    }
}

pub struct AutoPopulator {
    source: Arc<dyn BiographySource>,
    persona: PersonaGenerator,
    details: DetailGenerator,
}

impl AutoPopulator {
    pub fn new(source: Arc<dyn BiographySource>, llm: Arc<dyn LanguageModel>) -> Self {
        Self {
            source,
            persona: PersonaGenerator::new(llm.clone()),
            details: DetailGenerator::new(llm),
        }
    }

    pub fn persona(&self) -> &PersonaGenerator {
        &self.persona
    }

    /// Encyclopedia lookup, then persona and details generated from the
    /// post-lookup snapshot. Only non-empty values are merged.
    pub async fn populate(&self, character: &Character) -> PopulationOutcome {
        let mut updated = character.clone();

        let biography = updated.merge(&self.source.fetch(&character.name).await);
        let snapshot = updated.fields();

        let persona = match self.persona.generate(&updated.name, &snapshot).await {
            Some(persona) => {
                updated.persona = persona;
                updated.auto_generated = true;
                true
            }
            None => false,
        };

        let details = updated.merge(&self.details.generate(&updated.name, &snapshot).await);

        let mut outcome = PopulationOutcome {
            character: updated,
            biography,
            persona,
            details,
        };
        if outcome.succeeded() {
            outcome.character.touch();
            tracing::info!(
                biography, persona, details,
                "Auto-populated {}",
                character.name
            );
        } else {
            tracing::warn!("Auto-population found nothing for {}", character.name);
        }
        outcome
    }
}
