pub mod completion;
pub mod config;
pub mod error;
pub mod in_flight;
pub mod responder;

use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use chrono::{Duration, Utc};
use chronos_core::quiz::{score_answers, QuizResult};
use chronos_core::{
    normalize_text, BookingSession, BookingWizard, ChatMessage, CommandOutcome,
    ConversationSession, Sender, Transition, WizardCommand,
};
use chronos_observability::AppMetrics;
use chronos_storage::{BookingRepository, ConversationRepository};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};
use uuid::Uuid;

pub use completion::{
    extract_completion_text, CompletionBackend, CompletionError, CompletionService,
    OfflineCompletion, OpenAiCompletion,
};
pub use config::CompletionConfig;
pub use error::ChatError;
pub use in_flight::{InFlightTurns, TurnGuard};
pub use responder::{ChatReply, ChatResponder, ReplySource};

pub const DEFAULT_SESSION_TTL: std::time::Duration = std::time::Duration::from_secs(86_400);

#[derive(Debug, Clone, Deserialize)]
pub struct ChatInput {
    pub session_id: Option<String>,
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub session_id: String,
    pub reply: ChatReply,
    pub message: ChatMessage,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingUpdate {
    pub outcome: CommandOutcome,
    pub booking: BookingSession,
}

pub struct TravelAgent<S> {
    store: Arc<S>,
    responder: ChatResponder<CompletionService>,
    in_flight: InFlightTurns,
    metrics: Arc<AppMetrics>,
    session_ttl: Duration,
}

impl<S> TravelAgent<S>
where
    S: ConversationRepository + BookingRepository,
{
    pub fn new(
        store: Arc<S>,
        completion: CompletionService,
        metrics: Arc<AppMetrics>,
        session_ttl: std::time::Duration,
    ) -> Self {
        let session_ttl =
            Duration::from_std(session_ttl).unwrap_or_else(|_| Duration::hours(24));
        Self {
            store,
            responder: ChatResponder::new(completion, metrics.clone()),
            in_flight: InFlightTurns::new(),
            metrics,
            session_ttl,
        }
    }

    pub fn completion_mode(&self) -> &'static str {
        self.responder.mode()
    }

    pub fn metrics(&self) -> &Arc<AppMetrics> {
        &self.metrics
    }

    pub fn responder(&self) -> &ChatResponder<CompletionService> {
        &self.responder
    }

    pub fn in_flight(&self) -> &InFlightTurns {
        &self.in_flight
    }

    pub async fn open_conversation(&self) -> Result<ConversationSession> {
        let session = ConversationSession::open(
            Uuid::new_v4().to_string(),
            Utc::now() + self.session_ttl,
        );
        self.store.upsert_conversation(&session).await?;
        info!(session_id = %session.session_id, "conversation opened");
        Ok(session)
    }

    pub async fn conversation(&self, session_id: &str) -> Result<Option<ConversationSession>> {
        self.store.load_conversation(session_id).await
    }

    /// One user turn: record the message, answer it, record the reply.
    /// Without a session id a fresh conversation is opened.
    #[instrument(skip(self, input))]
    pub async fn handle_chat(&self, input: ChatInput) -> Result<ChatTurn, ChatError> {
        let text = normalize_text(&input.text);
        if text.is_empty() {
            return Err(ChatError::EmptyUtterance);
        }

        let started = Instant::now();
        let session_id = match input.session_id {
            Some(session_id) => session_id,
            None => self.open_conversation().await?.session_id,
        };

        let _turn = self
            .in_flight
            .try_begin(&session_id)
            .ok_or_else(|| ChatError::TurnInFlight(session_id.clone()))?;
        let mut session = self
            .store
            .load_conversation(&session_id)
            .await?
            .ok_or_else(|| ChatError::UnknownSession(session_id.clone()))?;

        session.push_message(text.as_str(), Sender::User);
        let history = std::mem::take(&mut session.history);
        let (reply, history) = self.responder.respond(&text, history).await;
        session.history = history;

        let message = session.push_message(reply.text.as_str(), Sender::Bot).clone();
        session.expires_at = Utc::now() + self.session_ttl;
        self.store.upsert_conversation(&session).await?;

        self.metrics.inc_chat_turn();
        self.metrics.observe_chat_latency(started.elapsed());
        info!(
            session_id = %session.session_id,
            topic = ?reply.topic,
            source = ?reply.source,
            "chat handled"
        );

        Ok(ChatTurn {
            session_id: session.session_id,
            reply,
            message,
        })
    }

    pub async fn create_booking(&self) -> Result<BookingSession> {
        let booking = BookingSession {
            booking_id: Uuid::new_v4().to_string(),
            wizard: BookingWizard::new(),
            expires_at: Utc::now() + self.session_ttl,
        };
        self.store.upsert_booking(&booking).await?;
        self.metrics.inc_booking_created();
        info!(booking_id = %booking.booking_id, "booking started");
        Ok(booking)
    }

    pub async fn booking(&self, booking_id: &str) -> Result<Option<BookingSession>> {
        self.store.load_booking(booking_id).await
    }

    #[instrument(skip(self, command))]
    pub async fn apply_booking_command(
        &self,
        booking_id: &str,
        command: WizardCommand,
    ) -> Result<BookingUpdate, ChatError> {
        let mut booking = self
            .store
            .load_booking(booking_id)
            .await?
            .ok_or_else(|| ChatError::UnknownBooking(booking_id.to_string()))?;

        let outcome = booking.wizard.apply(command);
        booking.expires_at = Utc::now() + self.session_ttl;
        self.store.upsert_booking(&booking).await?;

        if outcome.transition == Some(Transition::Confirmed) {
            self.metrics.inc_booking_confirmed();
            info!(
                booking_id = %booking.booking_id,
                total_price = booking.wizard.total_price(),
                "booking confirmed"
            );
        }

        Ok(BookingUpdate { outcome, booking })
    }

    pub fn quiz_result(&self, answers: &[usize]) -> Result<&'static QuizResult, ChatError> {
        let result = score_answers(answers)?;
        self.metrics.inc_quiz_scored();
        Ok(result)
    }

    pub async fn purge_expired_sessions(&self) -> Result<u64> {
        let now = Utc::now();
        let conversations = self.store.purge_expired_conversations(now).await?;
        let bookings = self.store.purge_expired_bookings(now).await?;
        Ok(conversations + bookings)
    }
}
