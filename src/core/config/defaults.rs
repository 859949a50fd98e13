use crate::core::config::data::{Config, GenerationParameters};

pub const DEFAULT_ENDPOINT_URL: &str = "https://deephub5971927254.services.ai.azure.com/models";
pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
pub const DEFAULT_MODELS: &[&str] = &["Deepseek-R1", "Phi-4", "gpt-4o", "gpt-4o-mini"];

pub const DEFAULT_MAX_TOKENS: u32 = 2048;
pub const DEFAULT_TEMPERATURE: f64 = 0.8;
pub const DEFAULT_TOP_P: f64 = 0.1;
pub const DEFAULT_PRESENCE_PENALTY: f64 = 0.0;
pub const DEFAULT_FREQUENCY_PENALTY: f64 = 0.0;

impl Default for GenerationParameters {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            top_p: DEFAULT_TOP_P,
            presence_penalty: DEFAULT_PRESENCE_PENALTY,
            frequency_penalty: DEFAULT_FREQUENCY_PENALTY,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint_url: DEFAULT_ENDPOINT_URL.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            generation: GenerationParameters::default(),
        }
    }
}
