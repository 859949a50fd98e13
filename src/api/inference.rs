//! HTTP implementation of [`CompletionService`] for a hosted chat-completion
//! endpoint (Azure AI model inference and compatible APIs).

use std::time::Instant;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::api::{ChatCompletionResponse, ChatMessage, ChatRequest};
use crate::auth::Credential;
use crate::core::chat_stream::{format_api_error, fragment_stream};
use crate::core::config::Config;
use crate::core::service::{
    Completion, CompletionChoice, CompletionRequest, CompletionService, ErrorKind,
    FragmentStream, ServiceError, TokenUsage,
};
use crate::utils::auth::add_auth_headers;
use crate::utils::url::{append_query, construct_api_url};

impl From<&CompletionRequest> for ChatRequest {
    fn from(request: &CompletionRequest) -> Self {
        let parameters = request.parameters;
        Self {
            model: request.model.clone(),
            messages: request.messages.iter().map(ChatMessage::from).collect(),
            max_tokens: parameters.max_tokens,
            temperature: parameters.temperature,
            top_p: parameters.top_p,
            presence_penalty: parameters.presence_penalty,
            frequency_penalty: parameters.frequency_penalty,
            stream: request.stream,
        }
    }
}

impl From<ChatCompletionResponse> for Completion {
    fn from(response: ChatCompletionResponse) -> Self {
        let usage = response.usage.unwrap_or_default();
        Self {
            choices: response
                .choices
                .into_iter()
                .map(|choice| CompletionChoice {
                    content: choice.message.content,
                })
                .collect(),
            usage: TokenUsage {
                completion_tokens: usage.completion_tokens,
                prompt_tokens: usage.prompt_tokens,
                total_tokens: usage.total_tokens,
            },
        }
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return ServiceError::from_status(status.as_u16(), err.to_string());
        }
        if err.is_decode() {
            return ServiceError::new(ErrorKind::Unknown, format!("invalid response body: {err}"));
        }
        ServiceError::new(ErrorKind::Network, err.to_string())
    }
}

pub struct InferenceClient {
    client: reqwest::Client,
    chat_url: String,
    credential: Option<Credential>,
}

impl InferenceClient {
    pub fn new(config: &Config, credential: Option<Credential>) -> Self {
        Self::with_client(reqwest::Client::new(), config, credential)
    }

    pub fn with_client(
        client: reqwest::Client,
        config: &Config,
        credential: Option<Credential>,
    ) -> Self {
        Self {
            client,
            chat_url: chat_completions_url(&config.endpoint_url, &config.api_version),
            credential,
        }
    }

    pub fn chat_url(&self) -> &str {
        &self.chat_url
    }

    async fn send(&self, request: &CompletionRequest) -> Result<reqwest::Response, ServiceError> {
        let credential = self.credential.as_ref().ok_or_else(|| {
            ServiceError::new(
                ErrorKind::Authentication,
                "no credential found; set AZURE_INFERENCE_CREDENTIAL or store one in the system keyring",
            )
        })?;

        debug!(
            model = %request.model,
            stream = request.stream,
            messages = request.messages.len(),
            "Issuing chat completion request"
        );

        let http_request = self
            .client
            .post(&self.chat_url)
            .header("Content-Type", "application/json");
        let http_request = add_auth_headers(http_request, credential);

        let response = http_request
            .json(&ChatRequest::from(request))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            let err = ServiceError::from_status(status.as_u16(), format_api_error(&error_text));
            warn!(
                model = %request.model,
                status = status.as_u16(),
                kind = ?err.kind(),
                recoverable = err.is_recoverable(),
                "Chat completion request failed"
            );
            return Err(err);
        }

        Ok(response)
    }
}

#[async_trait]
impl CompletionService for InferenceClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ServiceError> {
        let started = Instant::now();
        let response = self.send(request).await?;
        let body = response.json::<ChatCompletionResponse>().await?;
        debug!(
            model = %request.model,
            elapsed_ms = started.elapsed().as_millis() as u64,
            choices = body.choices.len(),
            "Chat completion received"
        );
        Ok(Completion::from(body))
    }

    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, ServiceError> {
        let response = self.send(request).await?;
        debug!(model = %request.model, "Chat completion stream opened");
        Ok(fragment_stream(response.bytes_stream()))
    }
}

pub fn chat_completions_url(endpoint_url: &str, api_version: &str) -> String {
    let url = construct_api_url(endpoint_url, "chat/completions");
    let api_version = api_version.trim();
    if api_version.is_empty() {
        url
    } else {
        append_query(&url, "api-version", api_version)
    }
}
