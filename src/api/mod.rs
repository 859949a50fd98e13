use serde::{Deserialize, Serialize};

use crate::core::message::Message;

#[derive(Serialize, Clone, Debug, PartialEq)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl From<&Message> for ChatMessage {
    fn from(message: &Message) -> Self {
        Self {
            role: message.role.as_str().to_string(),
            content: message.content.clone(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
    pub stream: bool,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatResponseMessage {
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatChoice {
    #[serde(default)]
    pub message: ChatResponseMessage,
}

#[derive(Deserialize, Debug, Default, Clone, Copy)]
pub struct ChatUsage {
    pub completion_tokens: Option<u64>,
    pub prompt_tokens: Option<u64>,
    pub total_tokens: Option<u64>,
}

#[derive(Deserialize, Debug)]
pub struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
    #[serde(default)]
    pub usage: Option<ChatUsage>,
}

#[derive(Deserialize, Debug, Default)]
pub struct ChatResponseDelta {
    pub content: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct ChatStreamChoice {
    #[serde(default)]
    pub delta: ChatResponseDelta,
}

#[derive(Deserialize, Debug)]
pub struct ChatStreamChunk {
    pub choices: Vec<ChatStreamChoice>,
}

pub mod inference;
