use crate::llm::{CompletionRequest, LanguageModel};
use shared::models::CharacterFields;
use std::sync::Arc;

const SYSTEM_PROMPT: &str = "You are an expert historian and character analyst. Create authentic \
    personas for historical figures based on historical facts and documented personality traits.";
const TEMPERATURE: f32 = 0.7;
const MAX_TOKENS: u32 = 800;

/// Renders a missing or empty field as "Unknown"
pub(crate) fn or_unknown(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(value) if !value.is_empty() => value,
        _ => "Unknown",
    }
}

/// Writes the roleplay system prompt for a character
pub struct PersonaGenerator {
    llm: Arc<dyn LanguageModel>,
}

impl PersonaGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub fn prompt(name: &str, fields: &CharacterFields) -> String {
        let name = if name.trim().is_empty() { "Unknown" } else { name };
        format!(
            "Create an authentic persona for {name} based on the following information:

Name: {name}
Era: {era}
Birth: {birth}
Death: {death}
Nationality: {nationality}
Occupation: {occupation}
Description: {description}
Major Achievements: {achievements}

Create a detailed persona that includes:
1. How they should speak (tone, vocabulary, phrases they might use)
2. Key topics they would discuss
3. Their philosophical views and beliefs
4. Important events from their life they might reference
5. Their personality traits and mannerisms
6. Historical context of their time period

Format this as a single paragraph that can be used as a system prompt for an AI chatbot to roleplay as this character authentically.
Start with \"You are {name}...\" and make it comprehensive but concise (under 600 words).
Include specific historical details, speaking patterns, and personality traits that would make the character feel authentic.",
            era = or_unknown(&fields.era),
            birth = or_unknown(&fields.birth_date),
            death = or_unknown(&fields.death_date),
            nationality = or_unknown(&fields.nationality),
            occupation = or_unknown(&fields.occupation),
            description = or_unknown(&fields.description),
            achievements = or_unknown(&fields.major_achievements),
        )
    }

    /// The generated persona, or `None` when the model failed or said nothing
    pub async fn generate(&self, name: &str, fields: &CharacterFields) -> Option<String> {
        let request = CompletionRequest::new(Self::prompt(name, fields))
            .system(SYSTEM_PROMPT)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        match self.llm.complete(request).await {
            Ok(persona) if !persona.trim().is_empty() => Some(persona),
            Ok(_) => {
                tracing::warn!("Empty persona generated for {}", name);
                None
            }
            Err(e) => {
                tracing::error!("Failed to generate persona for {}: {}", name, e);
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakeModel;

    #[test]
    fn prompt_renders_missing_fields_as_unknown() {
        let fields = CharacterFields {
            era: Some("1867-1934".to_string()),
            occupation: Some(String::new()),
            ..Default::default()
        };
        let prompt = PersonaGenerator::prompt("Marie Curie", &fields);

        assert!(prompt.contains("Name: Marie Curie"));
        assert!(prompt.contains("Era: 1867-1934"));
        assert!(prompt.contains("Occupation: Unknown"));
        assert!(prompt.contains("Death: Unknown"));
        assert!(prompt.contains("Start with \"You are Marie Curie...\""));
    }

    #[tokio::test]
    async fn generate_sends_the_historian_role() {
        let model = Arc::new(FakeModel::replying(["You are Marie Curie, a physicist."]));
        let generator = PersonaGenerator::new(model.clone());

        let persona = generator
            .generate("Marie Curie", &CharacterFields::default())
            .await;
        assert_eq!(persona.as_deref(), Some("You are Marie Curie, a physicist."));

        let requests = model.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].system.as_deref(), Some(SYSTEM_PROMPT));
        assert_eq!(requests[0].temperature, Some(0.7));
        assert_eq!(requests[0].max_tokens, Some(800));
    }

    #[tokio::test]
    async fn failures_and_blank_replies_yield_nothing() {
        let generator = PersonaGenerator::new(Arc::new(FakeModel::failing()));
        assert_eq!(
            generator.generate("Marie Curie", &CharacterFields::default()).await,
            None
        );

        let generator = PersonaGenerator::new(Arc::new(FakeModel::replying(["   "])));
        assert_eq!(
            generator.generate("Marie Curie", &CharacterFields::default()).await,
            None
        );
    }
}
