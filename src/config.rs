//! Environment-driven configuration

use std::time::Duration;

/// Settings for the completion oracle
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_context_tokens: usize,
    pub top_logprobs: usize,
    pub timeout_secs: u64,
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "davinci-002".to_string(),
            api_key: None,
            max_context_tokens: 4096,
            top_logprobs: 100,
            timeout_secs: 60,
        }
    }
}

impl OracleConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: std::env::var("ORACLE_URL").unwrap_or(defaults.base_url),
            model: std::env::var("ORACLE_MODEL").unwrap_or(defaults.model),
            api_key: std::env::var("ORACLE_API_KEY")
                .or_else(|_| std::env::var("OPENAI_API_KEY"))
                .ok(),
            max_context_tokens: env_parse("ORACLE_MAX_CONTEXT_TOKENS")
                .unwrap_or(defaults.max_context_tokens),
            top_logprobs: env_parse("ORACLE_TOP_LOGPROBS").unwrap_or(defaults.top_logprobs),
            timeout_secs: env_parse("ORACLE_TIMEOUT_SECS").unwrap_or(defaults.timeout_secs),
        }
    }
}

/// Randomized exponential backoff, as used by the relevance agent
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Total tries including the first; 0 is rejected with `RelevanceError::NoAttempts`
    pub max_attempts: usize,
    pub multiplier: Duration,
    pub max_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            multiplier: Duration::from_secs(1),
            max_delay: Duration::from_secs(60),
        }
    }
}

impl RetryPolicy {
    /// Upper bound of the wait after `attempt` (0-based) has failed
    pub fn delay_ceiling(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(attempt.min(31) as u32);
        self.multiplier.saturating_mul(factor).min(self.max_delay)
    }

    /// Uniform random wait in `[0, delay_ceiling(attempt)]`
    pub fn jittered_delay(&self, attempt: usize) -> Duration {
        use rand::Rng;

        let ceiling = self.delay_ceiling(attempt).as_secs_f64();
        if ceiling <= 0.0 {
            return Duration::ZERO;
        }
        Duration::from_secs_f64(rand::thread_rng().gen_range(0.0..=ceiling))
    }
}

/// Settings for the relevance-scoring agent
#[derive(Debug, Clone)]
pub struct RelevanceConfig {
    pub base_url: String,
    pub engine: String,
    pub api_key: Option<String>,
    pub retry: RetryPolicy,
}

impl RelevanceConfig {
    /// Returns None unless `RELEVANCE_URL` is set
    pub fn from_env() -> Option<Self> {
        let base_url = std::env::var("RELEVANCE_URL").ok()?;
        Some(Self {
            base_url,
            engine: std::env::var("RELEVANCE_ENGINE").unwrap_or_else(|_| "relevance".to_string()),
            api_key: std::env::var("RELEVANCE_API_KEY").ok(),
            retry: RetryPolicy::default(),
        })
    }
}

/// Settings for the HTTP server binary
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub deadline: Option<Duration>,
}

impl ServerConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PASSAGE_SELECT_PORT").unwrap_or(8081),
            deadline: env_parse("PASSAGE_SELECT_DEADLINE_SECS").map(Duration::from_secs),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse().ok())
}
