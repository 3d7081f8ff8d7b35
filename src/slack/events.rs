//! Inbound Slack Events API payloads and question extraction.

use regex::Regex;
use serde::Deserialize;
use std::sync::OnceLock;

/// Outer envelope of an Events API POST.
#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
pub enum EventEnvelope {
    /// One-time URL verification handshake; echo the challenge back.
    #[serde(rename = "url_verification")]
    UrlVerification { challenge: String },
    #[serde(rename = "event_callback")]
    EventCallback { event: SlackEvent },
}

/// The inner event we dispatch on.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum SlackEvent {
    #[serde(rename = "app_mention")]
    AppMention(MessageEvent),
    #[serde(rename = "message")]
    Message(MessageEvent),
    /// Event types we don't handle.
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MessageEvent {
    #[serde(default)]
    pub text: String,
    pub ts: String,
    pub thread_ts: Option<String>,
    pub channel: String,
    #[serde(default)]
    pub channel_type: Option<String>,
    pub bot_id: Option<String>,
    /// Set on non-user messages (edits, joins, bot posts).
    pub subtype: Option<String>,
}

impl MessageEvent {
    /// Whether this message came from a bot identity (including our own
    /// prior replies) or is otherwise not a plain user message.
    pub fn is_bot_or_system(&self) -> bool {
        self.bot_id.is_some() || self.subtype.is_some()
    }

    /// The thread every reply should attach to: the existing thread if the
    /// message is already in one, otherwise the message itself.
    pub fn reply_thread(&self) -> &str {
        self.thread_ts.as_deref().unwrap_or(&self.ts)
    }

    /// Extract the question: strip a leading `<@...>` mention token and
    /// trim. Returns `None` when nothing is left.
    pub fn question(&self) -> Option<String> {
        let question = strip_mention(&self.text).trim().to_string();
        if question.is_empty() {
            None
        } else {
            Some(question)
        }
    }
}

fn mention_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"<@[^>]+>").expect("valid mention pattern"))
}

fn strip_mention(text: &str) -> String {
    mention_pattern().replace(text, "").into_owned()
}
