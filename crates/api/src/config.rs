use std::env;
use std::time::Duration;

use chronos_agents::{CompletionConfig, DEFAULT_SESSION_TTL};

pub const DEFAULT_ALLOWED_ORIGIN: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub completion: Option<CompletionConfig>,
    pub session_ttl: Duration,
    pub allowed_origins: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            completion: None,
            session_ttl: DEFAULT_SESSION_TTL,
            allowed_origins: vec![DEFAULT_ALLOWED_ORIGIN.to_string()],
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let session_ttl = env::var("CHRONOS_SESSION_TTL_SECONDS")
            .ok()
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(|value| Duration::from_secs(value.clamp(60, 7 * 86_400)))
            .unwrap_or(DEFAULT_SESSION_TTL);

        Self {
            completion: CompletionConfig::from_env(),
            session_ttl,
            allowed_origins: parse_origins(env::var("CHRONOS_ALLOWED_ORIGINS").ok().as_deref()),
        }
    }

    pub fn with_completion(mut self, completion: CompletionConfig) -> Self {
        self.completion = Some(completion);
        self
    }
}

pub fn parse_origins(raw: Option<&str>) -> Vec<String> {
    let origins = raw
        .map(|value| {
            value
                .split(',')
                .map(|origin| origin.trim().trim_end_matches('/').to_string())
                .filter(|origin| !origin.is_empty())
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();

    if origins.is_empty() {
        vec![DEFAULT_ALLOWED_ORIGIN.to_string()]
    } else {
        origins
    }
}
