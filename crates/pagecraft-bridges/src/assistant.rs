// SPDX-License-Identifier: AGPL-3.0-or-later
//! The language assistant seam
//!
//! One request, one reply. Implementations decide transport and credentials;
//! the chat session and theme remix only see [`LanguageAssistant`].

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssistantError {
    #[error("API Key is missing")]
    MissingApiKey,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status; `message` is what the service reported
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("Malformed response: {0}")]
    Malformed(String),
}

pub type Result<T> = std::result::Result<T, AssistantError>;

/// Remote text generation
#[async_trait]
pub trait LanguageAssistant: Send + Sync {
    /// Send one prompt and return the generated text
    async fn generate_content(&self, prompt: &str) -> Result<String>;

    /// Whether a call can be attempted at all. Callers check this before
    /// sending so a missing key becomes a prompt for one, not an error.
    fn has_credential(&self) -> bool {
        true
    }
}
