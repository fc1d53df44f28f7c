use crate::error::ConfigError;
use dotenv::var;
use std::time::Duration;

/// Saved copy of the Fortune "100 Best Companies to Work For" page.
pub const HTML_FILE: &str = "fortune_100_companies_to_work_at.html";
pub const COMPANIES_FILE: &str = "fortune_100_companies.json";
pub const ENRICHED_FILE: &str = "fortune_100_companies_enriched_with_hq_addr.json";
pub const FINANCIALS_FILE: &str = "company_financials.json";

/// Courtesy pause between SEC requests.
pub const SEC_DELAY: Duration = Duration::from_millis(200);

/// Courtesy pause between Places requests; well under the free-tier QPS.
pub const PLACES_DELAY: Duration = Duration::from_millis(300);

/// Runtime settings, read from the environment (and `.env`, once the caller has loaded it).
///
/// | variable                | required by           | default |
/// |-------------------------|-----------------------|---------|
/// | `USER_AGENT`            | bootstrap, update     |         |
/// | `GOOGLE_PLACES_API_KEY` | enrich                |         |
/// | `SEC_DELAY_MS`          |                       | 200     |
/// | `PLACES_DELAY_MS`       |                       | 300     |
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Config {
    pub user_agent: Option<String>,
    pub places_api_key: Option<String>,
    pub sec_delay: Duration,
    pub places_delay: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_agent: None,
            places_api_key: None,
            sec_delay: SEC_DELAY,
            places_delay: PLACES_DELAY,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            user_agent: var("USER_AGENT").ok().filter(|v| !v.is_empty()),
            places_api_key: var("GOOGLE_PLACES_API_KEY").ok().filter(|v| !v.is_empty()),
            sec_delay: delay("SEC_DELAY_MS", SEC_DELAY)?,
            places_delay: delay("PLACES_DELAY_MS", PLACES_DELAY)?,
        })
    }

    /// The SEC rejects requests without a descriptive `User-Agent`.
    pub fn user_agent(&self) -> Result<&str, ConfigError> {
        self.user_agent
            .as_deref()
            .ok_or(ConfigError::Missing("USER_AGENT"))
    }

    pub fn places_api_key(&self) -> Result<&str, ConfigError> {
        self.places_api_key
            .as_deref()
            .ok_or(ConfigError::Missing("GOOGLE_PLACES_API_KEY"))
    }
}

fn delay(key: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    match var(key) {
        Ok(value) => parse_millis(key, &value),
        Err(_) => Ok(default),
    }
}

fn parse_millis(key: &'static str, value: &str) -> Result<Duration, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .map(Duration::from_millis)
        .map_err(|_| ConfigError::Invalid {
            key,
            value: value.to_string(),
        })
}
