//! Text rendering for bot replies and submission notifications.
//!
//! All output is Telegram HTML. User-controlled text (titles, questions,
//! answers, queries) is escaped before interpolation.

use super::chat::{InlineButton, OutgoingMessage};
use crate::models::{Form, Submission};

/// Maximum URL buttons attached to a list or search reply.
pub const LIST_BUTTON_LIMIT: usize = 5;

/// Telegram rejects message text longer than this.
pub const MESSAGE_CHAR_LIMIT: usize = 4096;

/// Room kept free for the "…and N more" tail.
const OVERFLOW_TAIL_RESERVE: usize = 64;

/// Answers longer than this are clipped in notifications.
const NOTIFICATION_ANSWER_CHARS: usize = 600;

pub const WELCOME_LINKED: &str = "Welcome back! Your account is managed via the web dashboard.";
pub const WELCOME_UNLINKED: &str = "Welcome! To use this form bot, please sign up on the website and link your Telegram account via the Settings page.";
pub const INVALID_LINKING_TOKEN: &str = "Invalid or expired linking token.";
pub const CHAT_ALREADY_LINKED: &str = "This Telegram account is already linked to another user.";
pub const ACCOUNT_ALREADY_LINKED: &str = "Your account is already linked to a different Telegram chat.";
pub const LINK_ACCOUNT_FIRST: &str = "Please link your account first via the website.";
pub const NO_FORMS_YET: &str = "You haven't created any forms yet.";
pub const SEARCH_USAGE: &str = "Please provide a search term. Example: /search Feedback";
pub const NO_SEARCH_RESULTS: &str = "No forms found matching your query.";
pub const UNKNOWN_COMMAND: &str = "Unknown command. Try /list or /search &lt;term&gt;.";
pub const TEMPORARY_FAILURE: &str = "Something went wrong. Please try again later.";

/// Escapes `&`, `<` and `>`, the characters Telegram's HTML parse mode
/// treats as markup in text.
pub fn escape_html(input: &str) -> String {
    html_escape::encode_text(input).into_owned()
}

/// Appends entries while they fit under [`MESSAGE_CHAR_LIMIT`]; the rest are
/// summarized as "…and N more {noun}".
fn append_within_limit(text: &mut String, entries: Vec<String>, noun: &str) {
    let total = entries.len();
    let mut used = text.chars().count();
    for (index, entry) in entries.into_iter().enumerate() {
        let len = entry.chars().count();
        if used + len + OVERFLOW_TAIL_RESERVE > MESSAGE_CHAR_LIMIT {
            text.push_str(&format!("…and {} more {}", total - index, noun));
            return;
        }
        used += len;
        text.push_str(&entry);
    }
}

fn clip(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}…", &text[..cut]),
        None => text.to_string(),
    }
}

/// Public submission URL for a form id.
pub fn submission_url(app_base_url: &str, form_id: &str) -> String {
    format!("{}/submit/{}", app_base_url.trim_end_matches('/'), form_id)
}

pub fn link_success(display_name: &str) -> String {
    format!(
        "Successfully linked to account: {}",
        escape_html(display_name)
    )
}

pub fn form_link(app_base_url: &str, form_id: &str) -> OutgoingMessage {
    OutgoingMessage::text(format!(
        "Here is the link for your form:\n{}",
        submission_url(app_base_url, form_id)
    ))
}

/// Reply to `/list`. Callers handle the empty case.
pub fn form_list(forms: &[Form], app_base_url: &str) -> OutgoingMessage {
    let mut text = String::from("<b>Your Forms:</b>\n\n");
    let entries = forms
        .iter()
        .enumerate()
        .map(|(index, form)| {
            format!(
                "{}. <b>{}</b> (ID: {})\n   /get_link_{}\n\n",
                index + 1,
                escape_html(&form.title),
                form.id,
                form.id
            )
        })
        .collect();
    append_within_limit(&mut text, entries, "forms");
    OutgoingMessage::text(text).with_buttons(buttons("View", forms, app_base_url))
}

/// Reply to `/search <query>`. Callers handle the empty case.
pub fn search_results(query: &str, forms: &[Form], app_base_url: &str) -> OutgoingMessage {
    let mut text = format!(
        "<b>Found {} forms matching \"{}\":</b>\n\n",
        forms.len(),
        escape_html(&clip(query, 200))
    );
    let entries = forms
        .iter()
        .enumerate()
        .map(|(index, form)| format!("{}. <b>{}</b>\n", index + 1, escape_html(&form.title)))
        .collect();
    append_within_limit(&mut text, entries, "forms");
    OutgoingMessage::text(text).with_buttons(buttons("Open", forms, app_base_url))
}

fn buttons(verb: &str, forms: &[Form], app_base_url: &str) -> Vec<InlineButton> {
    forms
        .iter()
        .take(LIST_BUTTON_LIMIT)
        .map(|form| {
            InlineButton::url(
                format!("{} {}", verb, form.title),
                submission_url(app_base_url, &form.id.to_string()),
            )
        })
        .collect()
}

/// Notification sent to a form owner for a new submission.
///
/// Questions appear in form order. Questions whose answer is missing or blank
/// are left out.
pub fn submission_notification(form: &Form, submission: &Submission) -> String {
    let mut text = format!(
        "📝 <b>New Submission for \"{}\"</b>\n\n",
        escape_html(&form.title)
    );
    let entries = form
        .questions
        .iter()
        .filter_map(|question| {
            let answer = submission.answer_for(&question.id);
            if answer.trim().is_empty() {
                return None;
            }
            Some(format!(
                "<b>{}</b>\n{}\n\n",
                escape_html(&question.text),
                escape_html(&clip(answer, NOTIFICATION_ANSWER_CHARS))
            ))
        })
        .collect();
    append_within_limit(&mut text, entries, "answers");
    text
}
