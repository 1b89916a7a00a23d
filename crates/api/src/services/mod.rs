//! Application services.

pub mod auth;
pub mod bot;
pub mod linking;
pub mod notification;
pub mod telegram;

pub use auth::{AuthError, AuthService};
pub use bot::BotCommandHandler;
pub use linking::{LinkOutcome, LinkingError, LinkingService, LinkingTicket};
pub use notification::SubmissionNotifier;
pub use telegram::{TelegramClient, TelegramError, Update};
