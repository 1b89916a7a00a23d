//! Bot command decoding.
//!
//! Inbound chat text is decoded once into [`BotCommand`]; handlers match on
//! the enum instead of on raw strings.

use regex::Regex;

lazy_static::lazy_static! {
    static ref GET_LINK_REGEX: Regex = Regex::new(r"^/get_link_([A-Za-z0-9_-]+)$").unwrap();
}

/// Every command the bot understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    /// `/start`, optionally carrying a linking token as deep-link payload.
    Start { token: Option<String> },
    /// `/list`
    List,
    /// `/search <query>`
    Search { query: Option<String> },
    /// `/get_link_<form id>`
    GetLink { form_id: String },
    /// Anything else, including plain text.
    Unknown,
}

impl BotCommand {
    /// Decodes message text.
    ///
    /// A `@botname` suffix on the command word is ignored, so commands picked
    /// from Telegram's menu in group chats decode the same way.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if !text.starts_with('/') {
            return BotCommand::Unknown;
        }

        let (word, rest) = match text.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (text, ""),
        };
        let word = word.split_once('@').map_or(word, |(cmd, _bot)| cmd);
        let argument = (!rest.is_empty()).then(|| rest.to_string());

        match word {
            "/start" => BotCommand::Start { token: argument },
            "/list" => BotCommand::List,
            "/search" => BotCommand::Search { query: argument },
            _ if argument.is_none() => GET_LINK_REGEX
                .captures(word)
                .and_then(|caps| caps.get(1))
                .map(|id| BotCommand::GetLink {
                    form_id: id.as_str().to_string(),
                })
                .unwrap_or(BotCommand::Unknown),
            _ => BotCommand::Unknown,
        }
    }
}
