//! Submission notifications to form owners.

use std::sync::Arc;

use domain::models::{Form, Submission};
use domain::services::messages::submission_notification;
use domain::services::{ChatGateway, NotificationResult, OutgoingMessage};
use persistence::repositories::UserRepository;
use sqlx::PgPool;

use crate::middleware::metrics::record_telegram_message;

/// Tells a form's owner about a new submission through the chat gateway.
///
/// Best effort: every failure is logged and reported in the returned
/// [`NotificationResult`], never as an error.
#[derive(Clone)]
pub struct SubmissionNotifier {
    users: UserRepository,
    gateway: Option<Arc<dyn ChatGateway>>,
}

impl SubmissionNotifier {
    pub fn new(pool: PgPool, gateway: Option<Arc<dyn ChatGateway>>) -> Self {
        Self {
            users: UserRepository::new(pool),
            gateway,
        }
    }

    pub async fn notify(&self, form: &Form, submission: &Submission) -> NotificationResult {
        let Some(gateway) = self.gateway.as_ref() else {
            tracing::debug!(form_id = %form.id, "No chat gateway configured, skipping notification");
            return NotificationResult::Skipped;
        };

        let owner = match self.users.find_by_id(form.user_id).await {
            Ok(owner) => owner,
            Err(e) => {
                tracing::warn!(error = %e, form_id = %form.id, "Failed to load form owner");
                return NotificationResult::Failed(e.to_string());
            }
        };

        let Some(chat_id) = owner.and_then(|o| o.telegram_id) else {
            tracing::info!(
                form_id = %form.id,
                user_id = %form.user_id,
                "Form owner has no linked Telegram account, skipping notification"
            );
            return NotificationResult::NotLinked;
        };

        let message = OutgoingMessage::text(submission_notification(form, submission));
        match gateway.send_message(chat_id, message).await {
            Ok(()) => {
                record_telegram_message("sent");
                tracing::info!(
                    form_id = %form.id,
                    submission_id = %submission.id,
                    chat_id,
                    "Submission notification sent"
                );
                NotificationResult::Sent
            }
            Err(e) => {
                record_telegram_message("failed");
                tracing::warn!(
                    error = %e,
                    form_id = %form.id,
                    submission_id = %submission.id,
                    chat_id,
                    "Failed to send submission notification"
                );
                NotificationResult::Failed(e.to_string())
            }
        }
    }
}
