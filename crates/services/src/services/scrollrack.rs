//! Scrollrack API client used for decklist legality checks.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;
use ts_rs::TS;
use url::Url;

use super::normalizer::normalize;

pub const DEFAULT_API_URL: &str = "https://scrollrack.topdeck.gg/api";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const GAME: &str = "mtg";
const FORMAT: &str = "commander";

/// Body of a failed validator response.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorBody {
    Json(serde_json::Value),
    Text(String),
}

impl ErrorBody {
    fn from_text(text: String) -> Self {
        match serde_json::from_str(&text) {
            Ok(value) => Self::Json(value),
            Err(_) => Self::Text(text),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum ScrollrackError {
    #[error("Scrollrack API error: {status} {status_text}")]
    Http {
        status: u16,
        status_text: String,
        body: ErrorBody,
    },
    #[error("network error: {0}")]
    Transport(String),
    #[error("timeout")]
    Timeout,
    #[error("invalid validator response: {0}")]
    Decode(String),
}

impl ScrollrackError {
    /// Status code reported by the validator, when it answered at all.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw body of a failed response.
    pub fn response_body(&self) -> Option<&ErrorBody> {
        match self {
            Self::Http { body, .. } => Some(body),
            _ => None,
        }
    }

    /// The validator rejected the request itself; sending it again cannot help.
    pub fn is_client_error(&self) -> bool {
        self.status_code()
            .is_some_and(|status| (400..500).contains(&status))
    }

    /// Returns true if the error is transient and should be retried.
    pub fn should_retry(&self) -> bool {
        !self.is_client_error()
    }
}

/// Validation result from the Scrollrack API
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct ValidationResult {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub decklist: String,
    #[serde(rename = "deckObj", default)]
    #[ts(type = "Record<string, unknown>")]
    pub deck_obj: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ValidateRequest<'a> {
    game: &'a str,
    format: &'a str,
    list: &'a str,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Connection settings for the validator.
#[derive(Debug, Clone)]
pub struct ScrollrackConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ScrollrackConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl ScrollrackConfig {
    /// Read `SCROLLRACK_API_URL` and `SCROLLRACK_TIMEOUT_SECS`, falling back to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_values(
            std::env::var("SCROLLRACK_API_URL").ok().as_deref(),
            std::env::var("SCROLLRACK_TIMEOUT_SECS").ok().as_deref(),
        )
    }

    pub fn from_values(
        base_url: Option<&str>,
        timeout_secs: Option<&str>,
    ) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(raw) = base_url {
            let url = Url::parse(raw).map_err(|_| ConfigError::Invalid {
                name: "SCROLLRACK_API_URL",
                value: raw.to_string(),
            })?;
            config.base_url = url.to_string();
        }

        if let Some(raw) = timeout_secs {
            let secs: u64 = raw.trim().parse().map_err(|_| ConfigError::Invalid {
                name: "SCROLLRACK_TIMEOUT_SECS",
                value: raw.to_string(),
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    fn validate_endpoint(&self) -> String {
        format!("{}/validate", self.base_url.trim_end_matches('/'))
    }
}

/// Anything that can check a normalized decklist.
#[async_trait]
pub trait DecklistValidator: Send + Sync {
    /// One validation round trip for already-normalized text.
    async fn submit(&self, normalized: &str) -> Result<ValidationResult, ScrollrackError>;

    /// Normalize and validate in a single attempt.
    async fn validate_decklist(&self, raw: &str) -> Result<ValidationResult, ScrollrackError> {
        self.submit(&normalize(raw)).await
    }
}

/// Scrollrack API client
#[derive(Debug, Clone)]
pub struct ScrollrackClient {
    http: Client,
    endpoint: String,
}

impl ScrollrackClient {
    pub fn new(config: &ScrollrackConfig) -> Result<Self, ScrollrackError> {
        let http = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("cedhtools-validate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ScrollrackError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.validate_endpoint(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

#[async_trait]
impl DecklistValidator for ScrollrackClient {
    async fn submit(&self, normalized: &str) -> Result<ValidationResult, ScrollrackError> {
        let request = ValidateRequest {
            game: GAME,
            format: FORMAT,
            list: normalized,
        };

        let res = self
            .http
            .post(&self.endpoint)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = res.status();
        // Read as text first so non-JSON error pages can still be surfaced.
        let text = res.text().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "Scrollrack rejected request");
            return Err(ScrollrackError::Http {
                status: status.as_u16(),
                status_text: status.canonical_reason().unwrap_or_default().to_string(),
                body: ErrorBody::from_text(text),
            });
        }

        serde_json::from_str(&text).map_err(|e| ScrollrackError::Decode(e.to_string()))
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ScrollrackError {
    if e.is_timeout() {
        ScrollrackError::Timeout
    } else {
        ScrollrackError::Transport(e.to_string())
    }
}
