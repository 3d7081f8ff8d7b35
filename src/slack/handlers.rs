//! Event handlers: mention and message events, acknowledgment and reply.

use std::sync::Arc;

use super::client::PostMessage;
use super::events::{MessageEvent, SlackEvent};
use crate::orchestrator::Orchestrator;

/// Posted when anything in the handler sequence fails.
pub const PROCESSING_APOLOGY: &str =
    "Sorry, I encountered an error while processing your question.";

/// Dispatch one inbound event.
///
/// Mentions are always considered; generic messages are dropped when they
/// originate from a bot identity, which also covers our own replies.
pub async fn handle_event(
    event: SlackEvent,
    chat: Arc<dyn PostMessage>,
    orchestrator: Orchestrator,
) {
    match event {
        SlackEvent::AppMention(message) => {
            if message.is_bot_or_system() {
                return;
            }
            answer_in_thread(&message, chat, &orchestrator).await;
        }
        SlackEvent::Message(message) => {
            if message.is_bot_or_system() {
                return;
            }
            let kind = match message.channel_type.as_deref() {
                Some("im") => "DM",
                _ => "channel",
            };
            if let Some(question) = message.question() {
                tracing::info!("Received message in {}: \"{}\"", kind, question);
            }
            answer_in_thread(&message, chat, &orchestrator).await;
        }
        SlackEvent::Other => {}
    }
}

/// Acknowledge, orchestrate, reply — all threaded to the originating turn.
async fn answer_in_thread(
    message: &MessageEvent,
    chat: Arc<dyn PostMessage>,
    orchestrator: &Orchestrator,
) {
    let Some(question) = message.question() else {
        return;
    };
    let thread = message.reply_thread();

    let ack = format!(":thinking_face: Looking into: \"{}\"", question);
    if let Err(err) = chat.post(&message.channel, thread, &ack).await {
        tracing::error!("Failed to post acknowledgment: {}", err);
        // Still try to answer; the ack is best-effort.
    }

    let answer = orchestrator.answer(&question).await;

    if let Err(err) = chat.post(&message.channel, thread, &answer.text).await {
        tracing::error!("Failed to post answer: {}", err);
        if let Err(err) = chat.post(&message.channel, thread, PROCESSING_APOLOGY).await {
            tracing::error!("Failed to post apology: {}", err);
        }
        return;
    }

    tracing::info!(
        "Sent response for question: \"{}\" (found_in_kb={})",
        question,
        answer.found_in_kb
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;

    use async_trait::async_trait;

    use crate::bedrock::{InferModel, RetrievePassages, RetrievedPassage};
    use crate::errors::BotError;

    #[derive(Default)]
    struct RecordingChat {
        posts: Mutex<Vec<(String, String, String)>>,
    }

    #[async_trait]
    impl PostMessage for RecordingChat {
        async fn post(&self, channel: &str, thread_ts: &str, text: &str) -> Result<(), BotError> {
            self.posts.lock().unwrap().push((
                channel.to_string(),
                thread_ts.to_string(),
                text.to_string(),
            ));
            Ok(())
        }
    }

    struct StaticRetrieval(Vec<RetrievedPassage>);

    #[async_trait]
    impl RetrievePassages for StaticRetrieval {
        async fn retrieve(&self, _question: &str) -> Result<Vec<RetrievedPassage>, BotError> {
            Ok(self.0.clone())
        }
    }

    struct EchoInference;

    #[async_trait]
    impl InferModel for EchoInference {
        async fn invoke(&self, question: &str, _context: Option<&str>) -> Result<String, BotError> {
            Ok(format!("answer to {}", question))
        }
    }

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(Arc::new(StaticRetrieval(vec![])), Arc::new(EchoInference))
    }

    fn mention(text: &str) -> MessageEvent {
        MessageEvent {
            text: text.to_string(),
            ts: "1700000000.000100".to_string(),
            thread_ts: None,
            channel: "C123".to_string(),
            channel_type: Some("channel".to_string()),
            bot_id: None,
            subtype: None,
        }
    }

    #[tokio::test]
    async fn mention_gets_ack_then_answer_in_thread() {
        let chat = Arc::new(RecordingChat::default());
        let event = SlackEvent::AppMention(mention("<@U123> what is S3?"));

        handle_event(event, chat.clone(), orchestrator()).await;

        let posts = chat.posts.lock().unwrap();
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0].1, "1700000000.000100");
        assert!(posts[0].2.contains("Looking into: \"what is S3?\""));
        assert_eq!(posts[1].2, "answer to what is S3?");
        assert_eq!(posts[1].1, "1700000000.000100");
    }

    #[tokio::test]
    async fn bot_messages_are_ignored() {
        let chat = Arc::new(RecordingChat::default());
        let mut message = mention("what is S3?");
        message.bot_id = Some("B42".to_string());

        handle_event(SlackEvent::Message(message), chat.clone(), orchestrator()).await;

        assert!(chat.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn empty_question_is_dropped_silently() {
        let chat = Arc::new(RecordingChat::default());
        let event = SlackEvent::AppMention(mention("<@U123>  "));

        handle_event(event, chat.clone(), orchestrator()).await;

        assert!(chat.posts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn replies_follow_an_existing_thread() {
        let chat = Arc::new(RecordingChat::default());
        let mut message = mention("what is S3?");
        message.thread_ts = Some("1699999999.000001".to_string());

        handle_event(SlackEvent::Message(message), chat.clone(), orchestrator()).await;

        let posts = chat.posts.lock().unwrap();
        assert!(posts.iter().all(|(_, thread, _)| thread == "1699999999.000001"));
    }
}
