use crate::llm::{CompletionRequest, LanguageModel};
use crate::services::persona::or_unknown;
use shared::models::CharacterFields;
use std::sync::Arc;

pub const ACHIEVEMENTS_MARKER: &str = "MAJOR_ACHIEVEMENTS:";
pub const CONTEXT_MARKER: &str = "HISTORICAL_CONTEXT:";
pub const QUOTES_MARKER: &str = "FAMOUS_QUOTES:";

/// Section markers in the order the model is asked to emit them
const MARKERS: [&str; 3] = [ACHIEVEMENTS_MARKER, CONTEXT_MARKER, QUOTES_MARKER];

const SYSTEM_PROMPT: &str =
    "You are a professional historian. Provide accurate historical information.";
const TEMPERATURE: f32 = 0.3;
const MAX_TOKENS: u32 = 600;

pub struct DetailGenerator {
    llm: Arc<dyn LanguageModel>,
}

impl DetailGenerator {
    pub fn new(llm: Arc<dyn LanguageModel>) -> Self {
        Self { llm }
    }

    pub fn prompt(name: &str, fields: &CharacterFields) -> String {
        let name = if name.trim().is_empty() { "Unknown" } else { name };
        format!(
            "Based on the historical figure {name}, provide the following information in a structured format:

Known information:
- Name: {name}
- Era: {era}
- Description: {description}

Please provide:
1. Major Achievements (3-5 key accomplishments)
2. Historical Context (the time period and world events during their life)
3. Famous Quotes (2-3 authentic quotes if known, otherwise indicate \"No documented quotes available\")

Format your response as:
{ACHIEVEMENTS_MARKER} [list the achievements]
{CONTEXT_MARKER} [describe the historical context]
{QUOTES_MARKER} [list quotes or indicate none available]

Be historically accurate and only include verified information.",
            era = or_unknown(&fields.era),
            description = or_unknown(&fields.description),
        )
    }

    /// Achievements, context and quotes for a character. Any failure yields
    /// an empty result.
    pub async fn generate(&self, name: &str, fields: &CharacterFields) -> CharacterFields {
        let request = CompletionRequest::new(Self::prompt(name, fields))
            .system(SYSTEM_PROMPT)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS);

        match self.llm.complete(request).await {
            Ok(reply) => parse_details(&reply),
            Err(e) => {
                tracing::error!("Failed to generate details for {}: {}", name, e);
                CharacterFields::default()
            }
        }
    }
}

/// Splits a labelled reply into its sections. Each section runs from its
/// marker to the nearest later marker; missing or blank sections stay absent.
pub fn parse_details(reply: &str) -> CharacterFields {
    let mut sections: [Option<String>; 3] = Default::default();

    for (index, marker) in MARKERS.iter().enumerate() {
        let Some(start) = reply.find(marker) else {
            continue;
        };
        let rest = &reply[start + marker.len()..];
        let end = MARKERS[index + 1..]
            .iter()
            .filter_map(|later| rest.find(later))
            .min()
            .unwrap_or(rest.len());

        let section = rest[..end].trim();
        if !section.is_empty() {
            sections[index] = Some(section.to_string());
        }
    }

    let [major_achievements, historical_context, famous_quotes] = sections;
    CharacterFields {
        major_achievements,
        historical_context,
        famous_quotes,
        ..Default::default()
    }
}
