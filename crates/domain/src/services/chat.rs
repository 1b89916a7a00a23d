//! Chat gateway abstraction.
//!
//! The gateway is the only way the rest of the system talks to the chat
//! platform. Command replies and submission notifications both go through
//! [`ChatGateway::send_message`], so a fake gateway can stand in for the
//! real bot in tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A URL button rendered under a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineButton {
    pub text: String,
    pub url: String,
}

impl InlineButton {
    pub fn url(text: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            url: url.into(),
        }
    }
}

/// An outbound message. `text` is HTML.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutgoingMessage {
    pub text: String,
    pub buttons: Vec<InlineButton>,
}

impl OutgoingMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            buttons: Vec::new(),
        }
    }

    pub fn with_buttons(mut self, buttons: Vec<InlineButton>) -> Self {
        self.buttons = buttons;
        self
    }
}

/// Failure to deliver a message. Always caught and logged by callers.
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Chat API rejected the request: {0}")]
    Rejected(String),
}

/// Outcome of a best-effort notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationResult {
    /// Message accepted by the chat platform.
    Sent,
    /// Owner has no chat identity bound.
    NotLinked,
    /// Nothing to do (gateway disabled).
    Skipped,
    /// Delivery failed; the triggering write is unaffected.
    Failed(String),
}

/// Sends messages to a chat identity.
#[async_trait::async_trait]
pub trait ChatGateway: Send + Sync {
    async fn send_message(&self, chat_id: i64, message: OutgoingMessage)
        -> Result<(), GatewayError>;
}

/// A message captured by [`MockChatGateway`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub chat_id: i64,
    pub message: OutgoingMessage,
}

/// In-memory gateway that records every message instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct MockChatGateway {
    sent: Arc<Mutex<Vec<SentMessage>>>,
    attempts: Arc<AtomicUsize>,
    /// Whether to simulate delivery failures.
    pub simulate_failure: bool,
}

impl MockChatGateway {
    pub fn new() -> Self {
        Self::default()
    }

    /// A gateway whose every send fails.
    pub fn failing() -> Self {
        Self {
            simulate_failure: true,
            ..Self::default()
        }
    }

    /// Number of `send_message` calls, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    /// Messages recorded so far, in send order.
    pub fn sent_messages(&self) -> Vec<SentMessage> {
        self.sent.lock().map(|s| s.clone()).unwrap_or_default()
    }

    /// Most recent message sent to `chat_id`.
    pub fn last_message_to(&self, chat_id: i64) -> Option<OutgoingMessage> {
        self.sent_messages()
            .into_iter()
            .rev()
            .find(|m| m.chat_id == chat_id)
            .map(|m| m.message)
    }
}

#[async_trait::async_trait]
impl ChatGateway for MockChatGateway {
    async fn send_message(
        &self,
        chat_id: i64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        if self.simulate_failure {
            tracing::warn!(chat_id, "Mock chat gateway simulating failure");
            return Err(GatewayError::Transport("Simulated failure".to_string()));
        }

        tracing::info!(
            chat_id,
            buttons = message.buttons.len(),
            "Mock: Would send chat message"
        );

        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentMessage { chat_id, message });
        }
        Ok(())
    }
}
