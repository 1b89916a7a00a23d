//! Telegram bot command handling.
//!
//! Each webhook message is decoded into a [`BotCommand`] and answered by
//! exactly one handler. Handlers only compute the reply; sending it, and
//! swallowing send failures, happens in [`BotCommandHandler::handle_message`].

use std::sync::Arc;

use domain::models::{Form, User};
use domain::services::messages;
use domain::services::{BotCommand, ChatGateway, OutgoingMessage};
use persistence::repositories::{FormRepository, UserRepository};
use shared::validation::like_contains_pattern;
use sqlx::PgPool;

use crate::config::Config;
use crate::middleware::metrics::record_telegram_message;
use crate::services::linking::{LinkOutcome, LinkingService};
use crate::services::telegram::Message;

pub struct BotCommandHandler {
    users: UserRepository,
    forms: FormRepository,
    linking: LinkingService,
    gateway: Arc<dyn ChatGateway>,
    app_base_url: String,
}

impl BotCommandHandler {
    pub fn new(pool: PgPool, gateway: Arc<dyn ChatGateway>, config: &Config) -> Self {
        Self {
            users: UserRepository::new(pool.clone()),
            forms: FormRepository::new(pool.clone()),
            linking: LinkingService::new(pool, &config.telegram, &config.linking),
            gateway,
            app_base_url: config.app_base_url().to_string(),
        }
    }

    /// Answers one inbound message. Messages without text are ignored.
    pub async fn handle_message(&self, message: &Message) {
        let Some(text) = message.text.as_deref() else {
            tracing::debug!(chat_id = message.chat.id, "Ignoring update without text");
            return;
        };

        let command = BotCommand::parse(text);
        let chat_id = message.chat.id;
        let sender_id = message.sender_id();
        tracing::info!(chat_id, sender_id, command = command_name(&command), "Bot command received");

        let reply = match self.reply_to(command, sender_id).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::error!(error = %e, chat_id, "Bot command failed");
                OutgoingMessage::text(messages::TEMPORARY_FAILURE)
            }
        };

        match self.gateway.send_message(chat_id, reply).await {
            Ok(()) => record_telegram_message("sent"),
            Err(e) => {
                record_telegram_message("failed");
                tracing::warn!(error = %e, chat_id, "Failed to send bot reply");
            }
        }
    }

    /// Computes the reply for a decoded command.
    pub async fn reply_to(
        &self,
        command: BotCommand,
        sender_id: i64,
    ) -> Result<OutgoingMessage, sqlx::Error> {
        match command {
            BotCommand::Start { token: None } => self.start(sender_id).await,
            BotCommand::Start { token: Some(token) } => self.link(&token, sender_id).await,
            BotCommand::List => self.list(sender_id).await,
            BotCommand::Search { query: None } => Ok(OutgoingMessage::text(messages::SEARCH_USAGE)),
            BotCommand::Search { query: Some(query) } => self.search(&query, sender_id).await,
            BotCommand::GetLink { form_id } => {
                Ok(messages::form_link(&self.app_base_url, &form_id))
            }
            BotCommand::Unknown => Ok(OutgoingMessage::text(messages::UNKNOWN_COMMAND)),
        }
    }

    async fn start(&self, sender_id: i64) -> Result<OutgoingMessage, sqlx::Error> {
        let text = match self.linked_user(sender_id).await? {
            Some(_) => messages::WELCOME_LINKED,
            None => messages::WELCOME_UNLINKED,
        };
        Ok(OutgoingMessage::text(text))
    }

    async fn link(&self, token: &str, sender_id: i64) -> Result<OutgoingMessage, sqlx::Error> {
        let reply = match self.linking.consume(token, sender_id).await? {
            LinkOutcome::Linked(user) => messages::link_success(user.display_name()),
            LinkOutcome::InvalidToken => messages::INVALID_LINKING_TOKEN.to_string(),
            LinkOutcome::ChatAlreadyLinked => messages::CHAT_ALREADY_LINKED.to_string(),
            LinkOutcome::AccountAlreadyLinked => messages::ACCOUNT_ALREADY_LINKED.to_string(),
        };
        Ok(OutgoingMessage::text(reply))
    }

    async fn list(&self, sender_id: i64) -> Result<OutgoingMessage, sqlx::Error> {
        let Some(user) = self.linked_user(sender_id).await? else {
            return Ok(OutgoingMessage::text(messages::LINK_ACCOUNT_FIRST));
        };

        let forms = self.forms_of(&user, None).await?;
        if forms.is_empty() {
            return Ok(OutgoingMessage::text(messages::NO_FORMS_YET));
        }
        Ok(messages::form_list(&forms, &self.app_base_url))
    }

    async fn search(&self, query: &str, sender_id: i64) -> Result<OutgoingMessage, sqlx::Error> {
        let Some(user) = self.linked_user(sender_id).await? else {
            return Ok(OutgoingMessage::text(messages::LINK_ACCOUNT_FIRST));
        };

        let pattern = like_contains_pattern(query);
        let forms = self.forms_of(&user, Some(&pattern)).await?;
        if forms.is_empty() {
            return Ok(OutgoingMessage::text(messages::NO_SEARCH_RESULTS));
        }

        tracing::debug!(
            user_id = %user.id,
            query = %query,
            matches = forms.len(),
            "Bot search"
        );
        Ok(messages::search_results(query, &forms, &self.app_base_url))
    }

    async fn linked_user(&self, sender_id: i64) -> Result<Option<User>, sqlx::Error> {
        Ok(self
            .users
            .find_by_telegram_id(sender_id)
            .await?
            .map(Into::into))
    }

    async fn forms_of(&self, user: &User, title_pattern: Option<&str>) -> Result<Vec<Form>, sqlx::Error> {
        Ok(self
            .forms
            .list_for_user(user.id, title_pattern, None, 0)
            .await?
            .into_iter()
            .map(Into::into)
            .collect())
    }
}

fn command_name(command: &BotCommand) -> &'static str {
    match command {
        BotCommand::Start { .. } => "start",
        BotCommand::List => "list",
        BotCommand::Search { .. } => "search",
        BotCommand::GetLink { .. } => "get_link",
        BotCommand::Unknown => "unknown",
    }
}
