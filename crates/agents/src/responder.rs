use std::sync::Arc;

use chronos_core::{classify_topic, normalize_text, rule_based_reply, ConversationHistory, Topic};
use chronos_observability::AppMetrics;
use serde::Serialize;
use tracing::{debug, warn};

use crate::completion::{CompletionBackend, CompletionError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplySource {
    Rules,
    Remote,
    Fallback,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatReply {
    pub text: String,
    pub source: ReplySource,
    pub topic: Topic,
}

pub struct ChatResponder<B> {
    backend: B,
    metrics: Arc<AppMetrics>,
}

impl<B> ChatResponder<B>
where
    B: CompletionBackend,
{
    pub fn new(backend: B, metrics: Arc<AppMetrics>) -> Self {
        Self { backend, metrics }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn mode(&self) -> &'static str {
        self.backend.mode()
    }

    /// Keyword answer with no I/O.
    pub fn respond_rules(&self, utterance: &str) -> ChatReply {
        rules_reply(utterance, ReplySource::Rules)
    }

    /// Records the utterance, then asks the backend. Any backend failure
    /// degrades to the keyword answer and leaves no assistant entry behind.
    pub async fn respond(
        &self,
        utterance: &str,
        mut history: ConversationHistory,
    ) -> (ChatReply, ConversationHistory) {
        let utterance = normalize_text(utterance);
        history.push_user(utterance.as_str());

        match self.backend.complete(&history).await {
            Ok(text) => {
                self.metrics.inc_remote_completion();
                history.push_assistant(text.as_str());
                let reply = ChatReply {
                    topic: classify_topic(&utterance),
                    text,
                    source: ReplySource::Remote,
                };
                (reply, history)
            }
            Err(CompletionError::NotConfigured) => {
                debug!("no completion backend, answering from rules");
                (rules_reply(&utterance, ReplySource::Rules), history)
            }
            Err(err) => {
                self.metrics.inc_fallback();
                warn!(
                    error = %err,
                    kind = err.kind(),
                    backend = self.backend.mode(),
                    "completion failed, falling back to rules"
                );
                (rules_reply(&utterance, ReplySource::Fallback), history)
            }
        }
    }
}

fn rules_reply(utterance: &str, source: ReplySource) -> ChatReply {
    ChatReply {
        text: rule_based_reply(utterance).to_string(),
        source,
        topic: classify_topic(utterance),
    }
}
