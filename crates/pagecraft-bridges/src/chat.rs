// SPDX-License-Identifier: AGPL-3.0-or-later
//! Chat turns against the language assistant
//!
//! A turn moves `Idle -> AwaitingResponse -> Idle`; the reply is applied and
//! recorded before the session is idle again. Failures become an `Error:`
//! message; nothing is retried. A turn borrows the session and the document store for its whole
//! duration, so dropping the future discards the reply before it can touch
//! the document.

use pagecraft_core::{apply_assistant_text, BlockId, DocumentStore};
use serde::{Deserialize, Serialize};

use crate::assistant::LanguageAssistant;
use crate::prompt::builder_prompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub text: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatState {
    #[default]
    Idle,
    AwaitingResponse,
}

/// What is sent and whether replies may edit the page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChatMode {
    /// Wrap input in the builder prompt and apply embedded instructions
    #[default]
    Builder,
    /// Send input as-is and show the reply as text
    Plain,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Blank input
    Ignored,
    /// No key configured; nothing was sent
    CredentialRequired,
    Replied { text: String, added: Option<BlockId> },
    Failed { text: String },
}

#[derive(Debug, Default)]
pub struct ChatSession {
    mode: ChatMode,
    state: ChatState,
    messages: Vec<ChatMessage>,
}

impl ChatSession {
    pub fn new(mode: ChatMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn mode(&self) -> ChatMode {
        self.mode
    }

    pub fn state(&self) -> ChatState {
        self.state
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Reset a session whose turn was dropped mid-request.
    pub fn cancel(&mut self) -> bool {
        if self.state == ChatState::AwaitingResponse {
            tracing::debug!("abandoned chat turn reset");
            self.state = ChatState::Idle;
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.messages.clear();
        self.state = ChatState::Idle;
    }

    /// Run one turn.
    pub async fn send(
        &mut self,
        assistant: &dyn LanguageAssistant,
        store: &mut DocumentStore,
        input: &str,
    ) -> TurnOutcome {
        let request = input.trim();
        if request.is_empty() {
            return TurnOutcome::Ignored;
        }
        self.cancel();
        if !assistant.has_credential() {
            return TurnOutcome::CredentialRequired;
        }

        self.push(ChatRole::User, request);
        self.state = ChatState::AwaitingResponse;

        let prompt = match self.mode {
            ChatMode::Builder => builder_prompt(request),
            ChatMode::Plain => request.to_string(),
        };

        let outcome = match assistant.generate_content(&prompt).await {
            Ok(reply) => match self.mode {
                ChatMode::Builder => {
                    let reply = apply_assistant_text(store, &reply);
                    TurnOutcome::Replied {
                        text: reply.text,
                        added: reply.added,
                    }
                }
                ChatMode::Plain => TurnOutcome::Replied {
                    text: reply,
                    added: None,
                },
            },
            Err(e) => {
                tracing::warn!(error = %e, "assistant call failed");
                TurnOutcome::Failed {
                    text: format!("Error: {e}"),
                }
            }
        };

        if let TurnOutcome::Replied { text, .. } | TurnOutcome::Failed { text } = &outcome {
            self.push(ChatRole::Model, text);
        }
        self.state = ChatState::Idle;
        outcome
    }

    fn push(&mut self, role: ChatRole, text: &str) {
        self.messages.push(ChatMessage {
            role,
            text: text.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assistant::{AssistantError, Result};
    use async_trait::async_trait;
    use pagecraft_core::{BlockKind, MemoryStore};
    use pretty_assertions::assert_eq;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    /// Replies with a fixed text and records prompts
    #[derive(Default)]
    struct Scripted {
        reply: String,
        prompts: Mutex<Vec<String>>,
    }

    impl Scripted {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                ..Self::default()
            }
        }
    }

    #[async_trait]
    impl LanguageAssistant for Scripted {
        async fn generate_content(&self, prompt: &str) -> Result<String> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            Ok(self.reply.clone())
        }
    }

    struct Failing;

    #[async_trait]
    impl LanguageAssistant for Failing {
        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            Err(AssistantError::Api {
                status: 403,
                message: "API key not valid.".to_string(),
            })
        }
    }

    struct Hanging;

    #[async_trait]
    impl LanguageAssistant for Hanging {
        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            std::future::pending::<Result<String>>().await
        }
    }

    struct NoKey;

    #[async_trait]
    impl LanguageAssistant for NoKey {
        async fn generate_content(&self, _prompt: &str) -> Result<String> {
            Err(AssistantError::MissingApiKey)
        }

        fn has_credential(&self) -> bool {
            false
        }
    }

    fn store() -> DocumentStore {
        DocumentStore::open(Arc::new(MemoryStore::new()))
    }

    #[tokio::test]
    async fn test_builder_turn_applies_instruction() {
        let assistant = Scripted::new(
            r#"Here you go! {"action":"addBlock","type":"footer","content":{"text":"(c) Bakery"}}"#,
        );
        let mut store = store();
        let mut session = ChatSession::new(ChatMode::Builder);

        let outcome = session.send(&assistant, &mut store, "  add a footer ").await;

        let added = store.blocks()[0].id().clone();
        assert_eq!(
            outcome,
            TurnOutcome::Replied {
                text: "Here you go!".to_string(),
                added: Some(added),
            }
        );
        assert_eq!(store.blocks()[0].kind(), BlockKind::Footer);
        assert_eq!(session.state(), ChatState::Idle);
        assert_eq!(
            session.messages(),
            &[
                ChatMessage { role: ChatRole::User, text: "add a footer".to_string() },
                ChatMessage { role: ChatRole::Model, text: "Here you go!".to_string() },
            ]
        );

        let prompts = assistant.prompts.lock().unwrap();
        assert!(prompts[0].contains("The user wants to: add a footer"));
    }

    #[tokio::test]
    async fn test_prose_reply_leaves_document() {
        let assistant = Scripted::new("Try a hero section first.");
        let mut store = store();
        let mut session = ChatSession::default();

        let outcome = session.send(&assistant, &mut store, "ideas?").await;
        assert_eq!(
            outcome,
            TurnOutcome::Replied {
                text: "Try a hero section first.".to_string(),
                added: None,
            }
        );
        assert!(store.document().is_empty());
    }

    #[tokio::test]
    async fn test_plain_mode_sends_raw_and_never_edits() {
        let assistant = Scripted::new(r#"{"action":"addBlock","type":"hero"}"#);
        let mut store = store();
        let mut session = ChatSession::new(ChatMode::Plain);

        session.send(&assistant, &mut store, "hello").await;
        assert_eq!(*assistant.prompts.lock().unwrap(), vec!["hello".to_string()]);
        assert!(store.document().is_empty());
    }

    #[tokio::test]
    async fn test_failure_is_error_message() {
        let mut store = store();
        let mut session = ChatSession::default();

        let outcome = session.send(&Failing, &mut store, "add a hero").await;
        assert_eq!(
            outcome,
            TurnOutcome::Failed {
                text: "Error: API key not valid.".to_string()
            }
        );
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.state(), ChatState::Idle);
        assert!(store.document().is_empty());
    }

    #[tokio::test]
    async fn test_blank_and_missing_key() {
        let mut store = store();
        let mut session = ChatSession::default();

        assert_eq!(session.send(&NoKey, &mut store, "   ").await, TurnOutcome::Ignored);
        assert_eq!(
            session.send(&NoKey, &mut store, "add a hero").await,
            TurnOutcome::CredentialRequired
        );
        assert!(session.messages().is_empty());
    }

    #[tokio::test]
    async fn test_dropped_turn_applies_nothing() {
        let mut store = store();
        let mut session = ChatSession::default();

        let turn = session.send(&Hanging, &mut store, "add a hero");
        let elapsed = tokio::time::timeout(Duration::from_millis(20), turn).await;
        assert!(elapsed.is_err());

        assert_eq!(session.state(), ChatState::AwaitingResponse);
        assert!(store.document().is_empty());
        assert!(session.cancel());
        assert_eq!(session.state(), ChatState::Idle);
        assert!(!session.cancel());
    }

    #[tokio::test]
    async fn test_new_turn_recovers_after_drop() {
        let mut store = store();
        let mut session = ChatSession::default();

        let turn = session.send(&Hanging, &mut store, "first");
        let _ = tokio::time::timeout(Duration::from_millis(20), turn).await;

        let assistant = Scripted::new("ok");
        let outcome = session.send(&assistant, &mut store, "second").await;
        assert_eq!(
            outcome,
            TurnOutcome::Replied { text: "ok".to_string(), added: None }
        );
        assert_eq!(session.state(), ChatState::Idle);
        // the abandoned user message stays in the transcript
        assert_eq!(session.messages().len(), 3);
    }
}
