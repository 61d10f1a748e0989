use async_trait::async_trait;
use regex::Regex;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use shared::models::CharacterFields;
use std::sync::LazyLock;
use std::time::Duration;
use thiserror::Error;

pub const ENCYCLOPEDIA_TIMEOUT: Duration = Duration::from_secs(10);

/// Characters of the extract kept as the description
const DESCRIPTION_LIMIT: usize = 1500;
/// Longer occupation matches are treated as noise
const OCCUPATION_LIMIT: usize = 100;

static DATE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d{1,2}\s+\w+\s+\d{4}|\d{4})").expect("invalid date regex")
});

/// Tried in order, first capture of the first match wins
static NATIONALITY_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\w+)\s+(?:physicist|scientist|leader|politician|artist|writer|philosopher)",
        r"(?i)born\s+in\s+(\w+)",
        r"(?i)(\w+)\s+independence",
        r"(?i)(\w+)\s+revolutionary",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid nationality regex"))
    .collect()
});

static OCCUPATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)was\s+an?\s+([^.]+?)(?:\s+who|\s+and|\.|,)",
        r"(?i)is\s+an?\s+([^.]+?)(?:\s+who|\s+and|\.|,)",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("invalid occupation regex"))
    .collect()
});

#[derive(Error, Debug)]
pub enum BiographyError {
    #[error("Cannot build a summary URL from {0:?}")]
    InvalidUrl(String),
    #[error("Encyclopedia request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Looks up a person and returns whatever biography fields could be found.
/// Lookup failures are not errors: they produce an empty result.
#[async_trait]
pub trait BiographySource: Send + Sync {
    async fn fetch(&self, name: &str) -> CharacterFields;
}

#[derive(Deserialize)]
struct PageSummary {
    #[serde(default)]
    extract: Option<String>,
}

/// Client for the Wikipedia REST page summary endpoint
pub struct WikipediaClient {
    client: reqwest::Client,
    base_url: String,
}

impl WikipediaClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, BiographyError> {
        let client = reqwest::Client::builder()
            .timeout(ENCYCLOPEDIA_TIMEOUT)
            .user_agent(concat!("historia/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// `<base>/<Title_With_Underscores>`, with the title percent-encoded
    fn summary_url(&self, name: &str) -> Result<Url, BiographyError> {
        let invalid = || BiographyError::InvalidUrl(self.base_url.clone());
        let title = name.trim().replace(' ', "_");
        let mut url = Url::parse(&self.base_url).map_err(|_| invalid())?;
        url.path_segments_mut()
            .map_err(|_| invalid())?
            .pop_if_empty()
            .push(&title);
        Ok(url)
    }

    /// The article extract, or `None` when the encyclopedia has no such page
    pub async fn fetch_extract(&self, name: &str) -> Result<Option<String>, BiographyError> {
        let url = self.summary_url(name)?;
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            if status == StatusCode::NOT_FOUND {
                tracing::info!("No encyclopedia article for {}", name);
            } else {
                tracing::warn!("Encyclopedia returned {} for {}", status, name);
            }
            return Ok(None);
        }

        let summary: PageSummary = response.json().await?;
        Ok(summary.extract)
    }
}

#[async_trait]
impl BiographySource for WikipediaClient {
    async fn fetch(&self, name: &str) -> CharacterFields {
        match self.fetch_extract(name).await {
            Ok(Some(extract)) => extract_fields(&extract),
            Ok(None) => CharacterFields::default(),
            Err(e) => {
                tracing::error!("Failed to fetch biography for {}: {:?}", name, e);
                CharacterFields::default()
            }
        }
    }
}

/// Best-effort field extraction from free text. Anything that does not match
/// is left absent.
pub fn extract_fields(extract: &str) -> CharacterFields {
    let mut fields = CharacterFields::default();

    let description: String = extract.chars().take(DESCRIPTION_LIMIT).collect();
    if !description.is_empty() {
        fields.description = Some(description);
    }

    let mut dates = DATE_PATTERN.find_iter(extract).map(|m| m.as_str());
    match (dates.next(), dates.next()) {
        (Some(birth), Some(death)) => {
            fields.era = Some(format!("{birth}-{death}"));
            fields.birth_date = Some(birth.to_string());
            fields.death_date = Some(death.to_string());
        }
        (Some(single), None) => {
            fields.era = Some(single.to_string());
            fields.birth_date = Some(single.to_string());
        }
        _ => {}
    }

    fields.nationality = NATIONALITY_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(extract))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string());

    // Only the first matching pattern is considered, even when its capture is too long
    fields.occupation = OCCUPATION_PATTERNS
        .iter()
        .find_map(|pattern| pattern.captures(extract))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|occupation| occupation.chars().count() < OCCUPATION_LIMIT);

    fields
}
