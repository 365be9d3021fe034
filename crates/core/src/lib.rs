pub mod advisory;
pub mod domain;
pub mod format;
pub mod llm;
pub mod market;

pub mod config {
    use anyhow::Context;

    // Values shipped in sample .env files; treat them like a missing key.
    const PLACEHOLDER_API_KEYS: &[&str] = &[
        "your-api-key-here",
        "your_api_key_here",
        "sk-ant-xxx",
        "changeme",
    ];

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub anthropic_api_key: Option<String>,
        pub sentry_dsn: Option<String>,
        pub market_data_live: bool,
        pub market_data_base_url: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            Ok(Self {
                anthropic_api_key: std::env::var("ANTHROPIC_API_KEY")
                    .ok()
                    .filter(|k| !is_placeholder_key(k)),
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
                market_data_live: std::env::var("MARKET_DATA_LIVE")
                    .ok()
                    .map(|s| parse_flag(&s))
                    .unwrap_or(true),
                market_data_base_url: std::env::var("MARKET_DATA_BASE_URL")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            })
        }

        /// Settings with every external service switched off.
        pub fn offline() -> Self {
            Self {
                anthropic_api_key: None,
                sentry_dsn: None,
                market_data_live: false,
                market_data_base_url: None,
            }
        }

        pub fn require_anthropic_api_key(&self) -> anyhow::Result<&str> {
            self.anthropic_api_key
                .as_deref()
                .context("ANTHROPIC_API_KEY is required")
        }

        pub fn llm_enabled(&self) -> bool {
            self.anthropic_api_key.is_some()
        }
    }

    pub fn is_placeholder_key(key: &str) -> bool {
        let key = key.trim();
        key.is_empty()
            || PLACEHOLDER_API_KEYS
                .iter()
                .any(|p| key.eq_ignore_ascii_case(p))
    }

    fn parse_flag(s: &str) -> bool {
        matches!(
            s.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "yes" | "on"
        )
    }

}
