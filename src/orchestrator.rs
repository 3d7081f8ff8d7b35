//! Answer pipeline: knowledge-base retrieval, then model inference.

use std::sync::Arc;

use crate::bedrock::{InferModel, RetrievePassages, RetrievedPassage};

/// Fallback answer when inference fails.
pub const GENERATION_APOLOGY: &str =
    "Sorry, I encountered an error while generating a response.";

/// Final answer for a question.
#[derive(Debug, Clone)]
pub struct Answer {
    pub text: String,
    /// Whether the answer was grounded in retrieved passages.
    pub found_in_kb: bool,
}

/// Ties the retrieval and inference clients together.
#[derive(Clone)]
pub struct Orchestrator {
    retrieval: Arc<dyn RetrievePassages>,
    inference: Arc<dyn InferModel>,
}

impl Orchestrator {
    pub fn new(retrieval: Arc<dyn RetrievePassages>, inference: Arc<dyn InferModel>) -> Self {
        Self {
            retrieval,
            inference,
        }
    }

    /// Answer a question, preferring knowledge-base grounding.
    ///
    /// Three-way branch on the retrieval outcome: passages found → infer
    /// with a context block; no passages → infer without context; retrieval
    /// error → log it and infer without context, same as the no-match case.
    /// Always returns a non-empty answer; inference failures degrade to a
    /// fixed apology.
    pub async fn answer(&self, question: &str) -> Answer {
        let (context, found_in_kb) = match self.retrieval.retrieve(question).await {
            Ok(passages) if !passages.is_empty() => (Some(build_context_block(&passages)), true),
            Ok(_) => (None, false),
            Err(err) => {
                tracing::warn!("Knowledge base retrieval failed, falling back to LLM: {}", err);
                (None, false)
            }
        };

        let text = match self.inference.invoke(question, context.as_deref()).await {
            Ok(text) => text,
            Err(err) => {
                tracing::error!("Error querying LLM: {}", err);
                GENERATION_APOLOGY.to_string()
            }
        };

        Answer { text, found_in_kb }
    }
}

/// Concatenate passage texts with blank-line separators, preserving the
/// service-returned order.
fn build_context_block(passages: &[RetrievedPassage]) -> String {
    passages
        .iter()
        .map(|passage| passage.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
