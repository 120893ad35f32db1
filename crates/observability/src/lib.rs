use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

static TRACING_INIT: OnceCell<()> = OnceCell::new();

#[derive(Debug, Default)]
pub struct AppMetrics {
    chat_turns_total: AtomicU64,
    remote_completions_total: AtomicU64,
    fallback_total: AtomicU64,
    bookings_created_total: AtomicU64,
    bookings_confirmed_total: AtomicU64,
    quizzes_scored_total: AtomicU64,
    total_chat_latency_millis: AtomicU64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub chat_turns_total: u64,
    pub remote_completions_total: u64,
    pub fallback_total: u64,
    pub bookings_created_total: u64,
    pub bookings_confirmed_total: u64,
    pub quizzes_scored_total: u64,
    pub avg_chat_latency_millis: f64,
}

impl AppMetrics {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn inc_chat_turn(&self) {
        self.chat_turns_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_remote_completion(&self) {
        self.remote_completions_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_fallback(&self) {
        self.fallback_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_booking_created(&self) {
        self.bookings_created_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_booking_confirmed(&self) {
        self.bookings_confirmed_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_quiz_scored(&self) {
        self.quizzes_scored_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn observe_chat_latency(&self, duration: Duration) {
        self.total_chat_latency_millis
            .fetch_add(duration.as_millis() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let turns = self.chat_turns_total.load(Ordering::Relaxed);
        let latency = self.total_chat_latency_millis.load(Ordering::Relaxed);

        MetricsSnapshot {
            chat_turns_total: turns,
            remote_completions_total: self.remote_completions_total.load(Ordering::Relaxed),
            fallback_total: self.fallback_total.load(Ordering::Relaxed),
            bookings_created_total: self.bookings_created_total.load(Ordering::Relaxed),
            bookings_confirmed_total: self.bookings_confirmed_total.load(Ordering::Relaxed),
            quizzes_scored_total: self.quizzes_scored_total.load(Ordering::Relaxed),
            avg_chat_latency_millis: if turns == 0 {
                0.0
            } else {
                latency as f64 / turns as f64
            },
        }
    }
}

pub fn init_tracing(service_name: &str) {
    TRACING_INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}=info,chronos_api=info,chronos_agents=info",
                service_name
            ))
        });

        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(true)
            .init();
    });
}
