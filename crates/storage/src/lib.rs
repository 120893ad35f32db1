use std::collections::HashMap;
use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use chronos_core::{BookingSession, ConversationSession};
use parking_lot::RwLock;

pub trait ConversationRepository: Send + Sync {
    async fn load_conversation(&self, session_id: &str) -> Result<Option<ConversationSession>>;
    async fn upsert_conversation(&self, session: &ConversationSession) -> Result<()>;
    async fn purge_expired_conversations(&self, now: DateTime<Utc>) -> Result<u64>;
}

pub trait BookingRepository: Send + Sync {
    async fn load_booking(&self, booking_id: &str) -> Result<Option<BookingSession>>;
    async fn upsert_booking(&self, booking: &BookingSession) -> Result<()>;
    async fn purge_expired_bookings(&self, now: DateTime<Utc>) -> Result<u64>;
}

/// Process-local session store. Nothing survives a restart.
#[derive(Clone, Default)]
pub struct MemoryStore {
    conversations: Arc<RwLock<HashMap<String, ConversationSession>>>,
    bookings: Arc<RwLock<HashMap<String, BookingSession>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn conversation_count(&self) -> usize {
        self.conversations.read().len()
    }

    pub fn booking_count(&self) -> usize {
        self.bookings.read().len()
    }
}

fn retain_live<T>(
    map: &mut HashMap<String, T>,
    now: DateTime<Utc>,
    expires_at: fn(&T) -> DateTime<Utc>,
) -> u64 {
    let before = map.len();
    map.retain(|_, value| expires_at(value) > now);
    (before - map.len()) as u64
}

impl ConversationRepository for MemoryStore {
    async fn load_conversation(&self, session_id: &str) -> Result<Option<ConversationSession>> {
        Ok(self.conversations.read().get(session_id).cloned())
    }

    async fn upsert_conversation(&self, session: &ConversationSession) -> Result<()> {
        self.conversations
            .write()
            .insert(session.session_id.clone(), session.clone());
        Ok(())
    }

    async fn purge_expired_conversations(&self, now: DateTime<Utc>) -> Result<u64> {
        Ok(retain_live(&mut *self.conversations.write(), now, |session| {
            session.expires_at
        }))
    }
}

impl BookingRepository for MemoryStore {
    async fn load_booking(&self, booking_id: &str) -> Result<Option<BookingSession>> {
        Ok(self.bookings.read().get(booking_id).cloned())
    }

    async fn upsert_booking(&self, booking: &BookingSession) -> Result<()> {
        self.bookings
            .write()
            .insert(booking.booking_id.clone(), booking.clone());
        Ok(())
    }

    async fn purge_expired_bookings(&self, now: DateTime<Utc>) -> Result<u64> {
        Ok(retain_live(&mut *self.bookings.write(), now, |booking| {
            booking.expires_at
        }))
    }
}
