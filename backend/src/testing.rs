//! Scripted stand-ins for the outbound collaborators.

use crate::llm::{CompletionRequest, LanguageModel, LlmError};
use crate::services::biography::BiographySource;
use async_trait::async_trait;
use shared::models::CharacterFields;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

/// Replies from a queue; once the queue is drained every call fails
#[derive(Default)]
pub struct FakeModel {
    replies: Mutex<VecDeque<Result<String, String>>>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl FakeModel {
    pub fn scripted(replies: impl IntoIterator<Item = Result<String, String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            requests: Mutex::default(),
        }
    }

    pub fn replying<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self::scripted(replies.into_iter().map(|r| Ok(r.into())))
    }

    pub fn failing() -> Self {
        Self::default()
    }

    /// Every request seen so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl LanguageModel for FakeModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(request);
        match self.replies.lock().unwrap().pop_front() {
            Some(Ok(reply)) => Ok(reply),
            Some(Err(message)) => Err(LlmError::Other(message)),
            None => Err(LlmError::Other("connection refused".to_string())),
        }
    }
}

/// Fixed biographies keyed by exact name; unknown names yield nothing
#[derive(Default)]
pub struct FakeEncyclopedia {
    entries: HashMap<String, CharacterFields>,
}

impl FakeEncyclopedia {
    pub fn with(mut self, name: &str, fields: CharacterFields) -> Self {
        self.entries.insert(name.to_string(), fields);
        self
    }
}

#[async_trait]
impl BiographySource for FakeEncyclopedia {
    async fn fetch(&self, name: &str) -> CharacterFields {
        self.entries.get(name).cloned().unwrap_or_default()
    }
}
