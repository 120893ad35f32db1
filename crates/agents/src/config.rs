use std::env;
use std::time::Duration;

pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub api_key: String,
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl CompletionConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            temperature: 0.7,
            max_tokens: 500,
            connect_timeout: Duration::from_secs(6),
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// `None` when no credential is configured, which selects offline mode.
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = lookup("CHRONOS_OPENAI_API_KEY")
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())?;

        let mut config = Self::new(api_key);
        if let Some(endpoint) = lookup("CHRONOS_OPENAI_ENDPOINT").filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }
        if let Some(model) = lookup("CHRONOS_OPENAI_MODEL").filter(|v| !v.trim().is_empty()) {
            config.model = model.trim().to_string();
        }
        if let Some(temperature) = lookup("CHRONOS_OPENAI_TEMPERATURE")
            .and_then(|value| value.trim().parse::<f32>().ok())
        {
            config.temperature = temperature.clamp(0.0, 2.0);
        }
        if let Some(max_tokens) = lookup("CHRONOS_OPENAI_MAX_TOKENS")
            .and_then(|value| value.trim().parse::<u32>().ok())
            .filter(|value| *value > 0)
        {
            config.max_tokens = max_tokens;
        }
        if let Some(seconds) = lookup("CHRONOS_OPENAI_TIMEOUT_SECONDS")
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|value| *value > 0)
        {
            config.timeout = Duration::from_secs(seconds);
        }

        Some(config)
    }
}
