use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Sampling parameters sent with every completion request.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct GenerationParameters {
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub presence_penalty: f64,
    pub frequency_penalty: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Base URL of the chat-completion endpoint, without the `/chat/completions` suffix
    pub endpoint_url: String,
    /// Value of the `api-version` query parameter
    pub api_version: String,
    /// Deployed model identifiers, in the order they are compared and listed
    pub models: Vec<String>,
    /// System instruction prepended to comparator prompts
    pub system_prompt: String,
    pub generation: GenerationParameters,
}

impl Config {
    pub fn model_count(&self) -> usize {
        self.models.len()
    }

    /// Look up a model by its 1-based position in the configured list.
    pub fn model_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|index| self.models.get(index))
            .map(String::as_str)
    }
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
