//! Telegram Bot API client and webhook payload types.
//!
//! [`TelegramClient`] implements [`ChatGateway`] on top of `sendMessage`.
//! It is built once in `main` and shared through `AppState`.

use std::time::Duration;

use domain::services::{ChatGateway, GatewayError, OutgoingMessage};
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::TelegramConfig;

/// Error type for building the client.
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("Telegram is not enabled")]
    NotEnabled,

    #[error("Telegram bot token is missing")]
    MissingToken,

    #[error("HTTP client error: {0}")]
    HttpError(#[from] reqwest::Error),
}

// ----------------------------------------------------------------------------
// Inbound webhook payload. Only the fields the bot reads are modelled.
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<Message>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub chat: Chat,
    #[serde(default)]
    pub from: Option<TelegramUser>,
    #[serde(default)]
    pub text: Option<String>,
}

impl Message {
    /// Identity used for linking: the sender, or the chat when there is none.
    pub fn sender_id(&self) -> i64 {
        self.from.as_ref().map(|u| u.id).unwrap_or(self.chat.id)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
}

// ----------------------------------------------------------------------------
// Outbound sendMessage request
// ----------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct SendMessageRequest<'a> {
    chat_id: i64,
    text: &'a str,
    parse_mode: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_markup: Option<InlineKeyboardMarkup<'a>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardMarkup<'a> {
    inline_keyboard: Vec<Vec<InlineKeyboardButton<'a>>>,
}

#[derive(Debug, Serialize)]
struct InlineKeyboardButton<'a> {
    text: &'a str,
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    ok: bool,
    #[serde(default)]
    description: Option<String>,
}

impl<'a> SendMessageRequest<'a> {
    fn new(chat_id: i64, message: &'a OutgoingMessage) -> Self {
        let reply_markup = if message.buttons.is_empty() {
            None
        } else {
            Some(InlineKeyboardMarkup {
                inline_keyboard: message
                    .buttons
                    .iter()
                    .map(|b| {
                        vec![InlineKeyboardButton {
                            text: &b.text,
                            url: &b.url,
                        }]
                    })
                    .collect(),
            })
        };

        Self {
            chat_id,
            text: &message.text,
            parse_mode: "HTML",
            reply_markup,
        }
    }
}

/// Bot API client owning its credential and HTTP connection pool.
pub struct TelegramClient {
    client: Client,
    send_message_url: String,
}

impl TelegramClient {
    pub fn new(config: &TelegramConfig) -> Result<Self, TelegramError> {
        if !config.enabled {
            return Err(TelegramError::NotEnabled);
        }
        if config.bot_token.trim().is_empty() {
            return Err(TelegramError::MissingToken);
        }

        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()?;

        Ok(Self {
            client,
            send_message_url: format!(
                "{}/bot{}/sendMessage",
                config.api_base_url.trim_end_matches('/'),
                config.bot_token.trim()
            ),
        })
    }
}

#[async_trait::async_trait]
impl ChatGateway for TelegramClient {
    async fn send_message(
        &self,
        chat_id: i64,
        message: OutgoingMessage,
    ) -> Result<(), GatewayError> {
        let request = SendMessageRequest::new(chat_id, &message);

        let response = self
            .client
            .post(&self.send_message_url)
            .json(&request)
            .send()
            .await
            // reqwest errors can echo the URL, which embeds the bot token.
            .map_err(|e| GatewayError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        let body: Option<ApiResponse> = response.json().await.ok();

        match body {
            Some(ApiResponse { ok: true, .. }) if status.is_success() => {
                tracing::debug!(chat_id, "Telegram message sent");
                Ok(())
            }
            Some(ApiResponse { description, .. }) => Err(GatewayError::Rejected(format!(
                "{}: {}",
                status.as_u16(),
                description.unwrap_or_else(|| "no description".to_string())
            ))),
            None => Err(GatewayError::Rejected(format!(
                "{}: unreadable response body",
                status.as_u16()
            ))),
        }
    }
}
