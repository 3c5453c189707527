//! Client for the ticket search endpoint.
//!
//! One request shape: `GET <url>` returning `{"tickets": [...]}`. Transient
//! failures are retried per [`retry::RetryPolicy`]; everything else surfaces as
//! a [`FetchError`] for the poller to report.

pub mod retry;

pub use reqwest::StatusCode;

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use thiserror::Error;
use url::Url;

use ticketwall_config::ApiConfig;
use ticketwall_types::{Ticket, TicketsEnvelope};

use self::retry::{RetryPolicy, send_with_retry};

const CONNECT_TIMEOUT_SECS: u64 = 10;
const TCP_KEEPALIVE_SECS: u64 = 60;
const POOL_IDLE_TIMEOUT_SECS: u64 = 90;

const MAX_ERROR_BODY_BYTES: usize = 2 * 1024;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("invalid API url {url:?}: {source}")]
    InvalidUrl {
        url: String,
        source: url::ParseError,
    },
    #[error("unsupported URL scheme {0:?} (expected http or https)")]
    UnsupportedScheme(String),
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Reusable handle; cheap to clone (the reqwest client is reference counted).
#[derive(Debug, Clone)]
pub struct TicketClient {
    http: reqwest::Client,
    url: Url,
    retry: RetryPolicy,
}

impl TicketClient {
    pub fn new(config: &ApiConfig) -> Result<Self, FetchError> {
        let url = Url::parse(&config.url).map_err(|source| FetchError::InvalidUrl {
            url: config.url.clone(),
            source,
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(FetchError::UnsupportedScheme(url.scheme().to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        if let Some(token) = config.token.as_deref()
            && let Ok(mut value) = HeaderValue::from_str(&format!("Bearer {token}"))
        {
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("ticketwall/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS).min(config.timeout()))
            .timeout(config.timeout())
            .tcp_keepalive(Some(Duration::from_secs(TCP_KEEPALIVE_SECS)))
            .pool_idle_timeout(Some(Duration::from_secs(POOL_IDLE_TIMEOUT_SECS)))
            .default_headers(headers)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            http,
            url,
            retry: RetryPolicy::with_max_retries(config.max_retries),
        })
    }

    #[must_use]
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub async fn fetch_tickets(&self) -> Result<Vec<Ticket>, FetchError> {
        let response = send_with_retry(|| self.http.get(self.url.clone()), &self.retry).await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::Status {
                status,
                body: truncate_body(body.trim()),
            });
        }

        let bytes = response.bytes().await?;
        let envelope: TicketsEnvelope = serde_json::from_slice(&bytes)?;
        tracing::debug!(count = envelope.tickets.len(), "Fetched tickets");
        Ok(envelope.tickets)
    }
}

fn truncate_body(body: &str) -> String {
    if body.len() <= MAX_ERROR_BODY_BYTES {
        return body.to_string();
    }
    let mut end = MAX_ERROR_BODY_BYTES;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}
