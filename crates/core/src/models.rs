use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::wizard::BookingWizard;

#[derive(Debug, Clone, Serialize)]
pub struct Destination {
    pub id: &'static str,
    pub label: &'static str,
    pub emoji: &'static str,
    pub description: &'static str,
    pub price: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TripDuration {
    #[default]
    ThreeDays,
    FiveDays,
    SevenDays,
}

impl TripDuration {
    pub const ALL: [TripDuration; 3] = [Self::ThreeDays, Self::FiveDays, Self::SevenDays];

    pub fn days(self) -> u8 {
        match self {
            Self::ThreeDays => 3,
            Self::FiveDays => 5,
            Self::SevenDays => 7,
        }
    }
}

impl TryFrom<u8> for TripDuration {
    type Error = CoreError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            3 => Ok(Self::ThreeDays),
            5 => Ok(Self::FiveDays),
            7 => Ok(Self::SevenDays),
            other => Err(CoreError::InvalidDuration(other)),
        }
    }
}

impl From<TripDuration> for u8 {
    fn from(value: TripDuration) -> Self {
        value.days()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingDetails {
    pub departure_date: String,
    pub duration: TripDuration,
    pub travelers: u8,
}

impl Default for BookingDetails {
    fn default() -> Self {
        Self {
            departure_date: String::new(),
            duration: TripDuration::default(),
            travelers: 1,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonalInfo {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
}

/// Partial update for [`BookingDetails`]. `travelers` is signed so callers
/// can express out-of-range attempts; the wizard clamps it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailsPatch {
    pub departure_date: Option<String>,
    pub duration: Option<TripDuration>,
    pub travelers: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoPatch {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Greeting,
    Paris,
    Cretaceous,
    Florence,
    Pricing,
    Booking,
    Safety,
    Packing,
    Duration,
    ReturnGuarantee,
    Advice,
    Thanks,
    Identity,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    User,
    Bot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: u64,
    pub text: String,
    pub sender: Sender,
    pub at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn time_label(&self) -> String {
        self.at.format("%H:%M").to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub role: Role,
    pub content: String,
}

/// Role-tagged context sent to the completion service. The system prompt is
/// always entry 0.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationHistory {
    entries: Vec<HistoryEntry>,
}

impl ConversationHistory {
    pub fn seeded() -> Self {
        Self::with_system_prompt(crate::catalog::SYSTEM_PROMPT)
    }

    pub fn with_system_prompt(prompt: &str) -> Self {
        Self {
            entries: vec![HistoryEntry {
                role: Role::System,
                content: prompt.to_string(),
            }],
        }
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.entries.push(HistoryEntry {
            role: Role::User,
            content: content.into(),
        });
    }

    pub fn push_assistant(&mut self, content: impl Into<String>) {
        self.entries.push(HistoryEntry {
            role: Role::Assistant,
            content: content.into(),
        });
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&HistoryEntry> {
        self.entries.last()
    }
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::seeded()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationSession {
    pub session_id: String,
    pub transcript: Vec<ChatMessage>,
    pub history: ConversationHistory,
    pub expires_at: DateTime<Utc>,
    next_message_id: u64,
}

impl ConversationSession {
    /// Opens a conversation whose transcript starts with the bot greeting.
    pub fn open(session_id: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        let mut session = Self {
            session_id: session_id.into(),
            transcript: Vec::new(),
            history: ConversationHistory::seeded(),
            expires_at,
            next_message_id: 0,
        };
        session.push_message(crate::catalog::GREETING, Sender::Bot);
        session
    }

    pub fn push_message(&mut self, text: impl Into<String>, sender: Sender) -> &ChatMessage {
        let message = ChatMessage {
            id: self.next_message_id,
            text: text.into(),
            sender,
            at: Utc::now(),
        };
        self.next_message_id += 1;
        self.transcript.push(message);
        &self.transcript[self.transcript.len() - 1]
    }

    pub fn last_message(&self) -> Option<&ChatMessage> {
        self.transcript.last()
    }

    /// True when the next message expected is a bot reply.
    pub fn awaiting_reply(&self) -> bool {
        matches!(self.last_message(), Some(message) if message.sender == Sender::User)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingSession {
    pub booking_id: String,
    pub wizard: BookingWizard,
    pub expires_at: DateTime<Utc>,
}
