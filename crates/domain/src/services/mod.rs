//! Domain services.
//!
//! Pure logic and service traits shared by the HTTP and bot surfaces.

pub mod bot_command;
pub mod chat;
pub mod export;
pub mod messages;

pub use bot_command::BotCommand;
pub use chat::{
    ChatGateway, GatewayError, InlineButton, MockChatGateway, NotificationResult,
    OutgoingMessage, SentMessage,
};
pub use export::{export_filename, submissions_csv, CSV_CONTENT_TYPE};
