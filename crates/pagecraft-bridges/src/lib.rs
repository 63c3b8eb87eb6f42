// SPDX-License-Identifier: AGPL-3.0-or-later
//! Pagecraft Bridges - Language assistant integration
//!
//! Connects the page builder to a remote text-generation service:
//! - `LanguageAssistant` trait and the Gemini `generateContent` client
//! - Chat sessions that turn replies into document edits
//! - Prompt composition, credential persistence and theme remix

pub mod assistant;
pub mod chat;
pub mod config;
pub mod credentials;
pub mod gemini;
pub mod prompt;
pub mod remix;

pub use assistant::{AssistantError, LanguageAssistant, Result};
pub use chat::{ChatMessage, ChatMode, ChatRole, ChatSession, ChatState, TurnOutcome};
pub use config::{AssistantConfig, ConfigError};
pub use credentials::ApiKeyStore;
pub use gemini::GeminiClient;
pub use remix::remix_theme;
