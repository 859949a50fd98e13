//! The completion-service seam shared by the comparator and the chat session.
//!
//! Both operations receive a `&dyn CompletionService` instead of reaching for a
//! global client, so the HTTP implementation in [`crate::api::inference`] can
//! be swapped for the scripted double in [`testing`].

use std::error::Error as StdError;
use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures_util::Stream;

use crate::core::config::GenerationParameters;
use crate::core::message::Message;

/// Text fragments of a streamed completion, in arrival order.
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<String, ServiceError>> + Send>>;

#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Issue a request and wait for the aggregated result.
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, ServiceError>;

    /// Issue a request and return the incremental fragments as they arrive.
    async fn complete_streaming(
        &self,
        request: &CompletionRequest,
    ) -> Result<FragmentStream, ServiceError>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<Message>,
    pub parameters: GenerationParameters,
    pub stream: bool,
}

impl CompletionRequest {
    pub fn new(
        model: impl Into<String>,
        messages: Vec<Message>,
        parameters: GenerationParameters,
    ) -> Self {
        Self {
            model: model.into(),
            messages,
            parameters,
            stream: false,
        }
    }

    pub fn streaming(mut self) -> Self {
        self.stream = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletionChoice {
    pub content: Option<String>,
}

/// Token counters reported by the service. Any of them may be absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub completion_tokens: Option<u64>,
    pub prompt_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

pub const MISSING_COUNTER: &str = "N/A";

pub fn format_counter(counter: Option<u64>) -> String {
    counter
        .map(|value| value.to_string())
        .unwrap_or_else(|| MISSING_COUNTER.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    pub choices: Vec<CompletionChoice>,
    pub usage: TokenUsage,
}

impl Completion {
    pub fn first_choice(&self) -> Option<&CompletionChoice> {
        self.choices.first()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    Authentication,
    RateLimit,
    MalformedRequest,
    Network,
    Unknown,
}

impl ErrorKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => ErrorKind::Authentication,
            429 => ErrorKind::RateLimit,
            400 | 404 | 413 | 422 => ErrorKind::MalformedRequest,
            _ => ErrorKind::Unknown,
        }
    }

    /// False when repeating the same call cannot succeed without the user
    /// changing credentials or configuration.
    pub fn is_recoverable(self) -> bool {
        !matches!(self, ErrorKind::Authentication | ErrorKind::MalformedRequest)
    }

    pub fn label(self) -> &'static str {
        match self {
            ErrorKind::Authentication => "authentication failed",
            ErrorKind::RateLimit => "rate limited",
            ErrorKind::MalformedRequest => "malformed request",
            ErrorKind::Network => "network error",
            ErrorKind::Unknown => "unexpected error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceError {
    kind: ErrorKind,
    message: String,
}

impl ServiceError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        Self::new(ErrorKind::from_status(status), message)
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind.is_recoverable()
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

impl StdError for ServiceError {}
