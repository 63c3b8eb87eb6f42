// SPDX-License-Identifier: AGPL-3.0-or-later
//! Gemini `generateContent` client

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::assistant::{AssistantError, LanguageAssistant, Result};
use crate::config::AssistantConfig;

/// Reply text when the service returned no candidate text
pub const EMPTY_REPLY: &str = "No response generated.";

const FAILED_REQUEST: &str = "Failed to fetch from Gemini";

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(config: &AssistantConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key: config.api_key().map(str::to_string),
        }
    }

    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }

    /// Replace the key; blank clears it
    pub fn set_api_key(&mut self, key: Option<&str>) {
        self.api_key = key.map(str::trim).filter(|k| !k.is_empty()).map(str::to_string);
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn url(&self, key: &str) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint,
            self.model,
            urlencoding::encode(key)
        )
    }
}

#[async_trait]
impl LanguageAssistant for GeminiClient {
    async fn generate_content(&self, prompt: &str) -> Result<String> {
        let key = self.api_key.as_deref().ok_or(AssistantError::MissingApiKey)?;
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        tracing::debug!(model = %self.model, prompt_len = prompt.len(), "sending generateContent");
        let response = self.http.post(self.url(key)).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<Value>()
                .await
                .ok()
                .and_then(|v| {
                    v.pointer("/error/message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                })
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| FAILED_REQUEST.to_string());
            tracing::warn!(status = status.as_u16(), %message, "generateContent failed");
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: Value = response
            .json()
            .await
            .map_err(|e| AssistantError::Malformed(e.to_string()))?;
        let text = reply
            .pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .unwrap_or(EMPTY_REPLY);
        Ok(text.to_string())
    }

    fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }
}
