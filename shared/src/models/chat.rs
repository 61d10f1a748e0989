use serde::{Deserialize, Serialize};

/// Body of `POST /api/chat/`. Both fields are optional on the wire so that a
/// missing one is reported as a descriptive client error.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ChatRequest {
    #[serde(default)]
    pub character: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ChatReply {
    /// Stored name of the character, regardless of the casing in the request
    pub character: String,
    pub reply: String,
}
