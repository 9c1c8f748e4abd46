//! Main zone API client implementation.

use crate::api::*;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;
use zonewatch_core::{ApiResponse, Result, ZoneError};

/// The zone API base URL
pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default request budget; the provider allows 1200 requests per 5 minutes
const DEFAULT_REQUESTS_PER_MINUTE: u32 = 240;

/// Provider error code for a malformed `Authorization` header
const MALFORMED_AUTH_HEADER_CODE: i64 = 6111;

/// Bearer-authenticated zone API client. Cheap to clone.
#[derive(Clone)]
pub struct ZoneClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: HttpClient,
    auth: HeaderValue,
    base_url: String,
    limiter: Option<DefaultDirectRateLimiter>,
}

impl std::fmt::Debug for ZoneClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ZoneClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl ZoneClient {
    /// Create a new client with the given API token using default settings
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ZoneClientBuilder::new(token).build()
    }

    /// Create a builder for custom configuration
    #[must_use]
    pub fn builder(token: impl Into<String>) -> ZoneClientBuilder {
        ZoneClientBuilder::new(token)
    }

    /// Access zone listing endpoints
    #[must_use]
    pub fn zones(&self) -> ZonesApi<'_> {
        ZonesApi::new(self)
    }

    /// Access DNS record endpoints
    #[must_use]
    pub fn dns_records(&self) -> DnsRecordsApi<'_> {
        DnsRecordsApi::new(self)
    }

    /// Access email routing endpoints
    #[must_use]
    pub fn email_routing(&self) -> EmailRoutingApi<'_> {
        EmailRoutingApi::new(self)
    }

    /// Access health check endpoints
    #[must_use]
    pub fn health_checks(&self) -> HealthChecksApi<'_> {
        HealthChecksApi::new(self)
    }

    /// Access zone and SSL settings endpoints
    #[must_use]
    pub fn settings(&self) -> SettingsApi<'_> {
        SettingsApi::new(self)
    }

    /// Access log endpoints
    #[must_use]
    pub fn logs(&self) -> LogsApi<'_> {
        LogsApi::new(self)
    }

    /// Perform a GET request and unwrap the response envelope
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.get_with_query(path, &[]).await
    }

    /// Perform a GET request with query parameters and unwrap the envelope
    pub(crate) async fn get_with_query<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.build_url(path, params)?;

        if let Some(limiter) = &self.inner.limiter {
            limiter.until_ready().await;
        }

        debug!(url = %url, "GET request");

        let response = self
            .inner
            .http
            .get(url)
            .header(AUTHORIZATION, self.inner.auth.clone())
            .send()
            .await
            .map_err(map_transport_error)?;

        self.handle_response(path, response).await
    }

    /// Build a URL with query parameters
    fn build_url(&self, path: &str, params: &[(&str, &str)]) -> Result<Url> {
        let mut url = Url::parse(&format!("{}{path}", self.inner.base_url))
            .map_err(|e| ZoneError::Config(format!("invalid URL for {path}: {e}")))?;

        if !params.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in params {
                pairs.append_pair(key, value);
            }
        }

        Ok(url)
    }

    /// Handle an API response and unwrap the `{success, result, errors}` envelope
    async fn handle_response<T: DeserializeOwned>(
        &self,
        path: &str,
        response: reqwest::Response,
    ) -> Result<T> {
        let status = response.status();
        let body = response.text().await.map_err(map_transport_error)?;

        if !status.is_success() {
            return Err(error_for_status(status.as_u16(), path, &body));
        }

        let envelope: ApiResponse<T> = serde_json::from_str(&body)?;
        if !envelope.success {
            let message = envelope
                .errors
                .first()
                .map_or_else(|| "unknown error".to_string(), |e| e.message.clone());
            return Err(ZoneError::Api {
                code: status.as_u16(),
                message,
            });
        }

        envelope.result.ok_or_else(|| ZoneError::Api {
            code: status.as_u16(),
            message: format!("empty result from {path}"),
        })
    }
}

fn map_transport_error(err: reqwest::Error) -> ZoneError {
    if err.is_timeout() {
        ZoneError::Timeout
    } else {
        ZoneError::Http(err.to_string())
    }
}

/// Convert an error response to a [`ZoneError`]
fn error_for_status(status: u16, path: &str, body: &str) -> ZoneError {
    let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(body).ok();
    let first = envelope.as_ref().and_then(|e| e.errors.first());
    let message = first.map_or_else(|| body.to_string(), |e| e.message.clone());

    match status {
        401 => ZoneError::Unauthorized,
        400 if first.is_some_and(|e| {
            e.code == MALFORMED_AUTH_HEADER_CODE || e.message.contains("Authorization header")
        }) =>
        {
            ZoneError::InvalidCredentialFormat
        }
        404 => ZoneError::NotFound {
            resource: path.to_string(),
        },
        429 => {
            warn!("Rate limited by zone API");
            ZoneError::RateLimited
        }
        _ => ZoneError::Api {
            code: status,
            message,
        },
    }
}

/// Builder for configuring a [`ZoneClient`]
pub struct ZoneClientBuilder {
    token: String,
    base_url: String,
    timeout: Duration,
    user_agent: String,
    requests_per_minute: u32,
}

impl ZoneClientBuilder {
    /// Create a new builder with the given API token
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: format!("zonewatch/{}", env!("CARGO_PKG_VERSION")),
            requests_per_minute: DEFAULT_REQUESTS_PER_MINUTE,
        }
    }

    /// Set the base URL (useful for testing)
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Set the request timeout
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the User-Agent header
    #[must_use]
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Limit outgoing requests; `0` disables the limiter
    #[must_use]
    pub const fn requests_per_minute(mut self, rpm: u32) -> Self {
        self.requests_per_minute = rpm;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ZoneClient> {
        let token = self.token.trim();
        if token.is_empty() {
            return Err(ZoneError::EmptyCredential);
        }

        let mut auth = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| ZoneError::InvalidCredentialFormat)?;
        auth.set_sensitive(true);

        let http = HttpClient::builder()
            .timeout(self.timeout)
            .user_agent(&self.user_agent)
            .gzip(true)
            .build()
            .map_err(|e| ZoneError::Config(format!("failed to build HTTP client: {e}")))?;

        let limiter = NonZeroU32::new(self.requests_per_minute)
            .map(|rpm| RateLimiter::direct(Quota::per_minute(rpm)));

        Ok(ZoneClient {
            inner: Arc::new(ClientInner {
                http,
                auth,
                base_url: self.base_url,
                limiter,
            }),
        })
    }
}
