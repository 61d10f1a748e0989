use async_openai::{
    Client,
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
        ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs,
    },
};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// A single-turn chat completion: optional system prompt plus one user message
#[derive(Clone, Debug, PartialEq)]
pub struct CompletionRequest {
    pub system: Option<String>,
    pub user: String,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

impl CompletionRequest {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            system: None,
            user: user.into(),
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("{0}")]
    Api(#[from] OpenAIError),
    #[error("Language model did not answer within {0:?}")]
    Timeout(Duration),
    #[error("Language model returned no content")]
    EmptyReply,
    #[error("{0}")]
    Other(String),
}

#[async_trait]
pub trait LanguageModel: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError>;
}

/// Any OpenAI-compatible chat completion endpoint (Groq, OpenRouter, OpenAI...)
pub struct OpenAiModel {
    client: Client<OpenAIConfig>,
    model: String,
    timeout: Option<Duration>,
}

impl OpenAiModel {
    pub fn new(
        api_key: impl Into<String>,
        api_base: impl Into<String>,
        model: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Self {
        let config = OpenAIConfig::new()
            .with_api_key(api_key)
            .with_api_base(api_base);

        Self {
            client: Client::with_config(config),
            model: model.into(),
            timeout,
        }
    }

    async fn send(&self, request: CompletionRequest) -> Result<String, LlmError> {
        let mut messages: Vec<ChatCompletionRequestMessage> = Vec::new();
        if let Some(system) = request.system {
            let msg = ChatCompletionRequestSystemMessageArgs::default()
                .content(system)
                .build()?;
            messages.push(ChatCompletionRequestMessage::System(msg));
        }
        let msg = ChatCompletionRequestUserMessageArgs::default()
            .content(request.user)
            .build()?;
        messages.push(ChatCompletionRequestMessage::User(msg));

        let mut builder = CreateChatCompletionRequestArgs::default();
        builder.model(self.model.clone()).messages(messages);
        if let Some(temperature) = request.temperature {
            builder.temperature(temperature);
        }
        if let Some(max_tokens) = request.max_tokens {
            builder.max_completion_tokens(max_tokens);
        }

        tracing::debug!(model = %self.model, "Sending chat completion");
        let response = self.client.chat().create(builder.build()?).await?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyReply)
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    async fn complete(&self, request: CompletionRequest) -> Result<String, LlmError> {
        match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.send(request))
                .await
                .map_err(|_| LlmError::Timeout(limit))?,
            None => self.send(request).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, routing::post};

    #[test]
    fn request_builder_sets_every_option() {
        let request = CompletionRequest::new("Hello")
            .system("You are Marie Curie.")
            .temperature(0.3)
            .max_tokens(600);

        assert_eq!(request.user, "Hello");
        assert_eq!(request.system.as_deref(), Some("You are Marie Curie."));
        assert_eq!(request.temperature, Some(0.3));
        assert_eq!(request.max_tokens, Some(600));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_an_error() {
        let model = OpenAiModel::new(
            "test-key",
            "http://127.0.0.1:9/v1",
            "test-model",
            Some(Duration::from_secs(5)),
        );
        let result = model.complete(CompletionRequest::new("Hello")).await;
        assert!(result.is_err());
    }

    async fn serve_stalled_endpoint() -> String {
        let router = Router::new().route(
            "/v1/chat/completions",
            post(|| async {
                tokio::time::sleep(Duration::from_secs(30)).await;
                "{}"
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });
        format!("http://{addr}/v1")
    }

    #[tokio::test]
    async fn slow_endpoint_times_out() {
        let limit = Duration::from_millis(200);
        let model = OpenAiModel::new(
            "test-key",
            serve_stalled_endpoint().await,
            "test-model",
            Some(limit),
        );

        let started = std::time::Instant::now();
        let result = model.complete(CompletionRequest::new("Hello")).await;

        assert!(matches!(result, Err(LlmError::Timeout(d)) if d == limit));
        assert!(started.elapsed() < Duration::from_secs(5));
    }
}
