//! Client layer: orchestrates transport calls and the environment auto-fix.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{
    Endpoint, KnownStatusCode, Notification, StatusCode, ValidationError, VerificationRequest,
    VerificationResponse,
};

const DEFAULT_PRODUCTION_ENDPOINT: &str = "https://buy.itunes.apple.com/verifyReceipt";
const DEFAULT_SANDBOX_ENDPOINT: &str = "https://sandbox.itunes.apple.com/verifyReceipt";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    status_text: String,
    body: Vec<u8>,
}

trait HttpTransport: Send + Sync {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_json<'a>(
        &'a self,
        url: &'a str,
        body: Vec<u8>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, "application/json")
                .body(body)
                .send()
                .await?;
            let status = response.status();
            let body = response.bytes().await?.to_vec();
            Ok(HttpResponse {
                status: status.as_u16(),
                status_text: status.to_string(),
                body,
            })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`VerificationClient`].
///
/// Every variant except [`VerifyError::Cancelled`] keeps the underlying cause.
/// A decoded response is never an error, whatever its status code.
pub enum VerifyError {
    /// HTTP client / transport failure (DNS, TLS, connection, timeouts).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status_text}")]
    HttpStatus {
        status: u16,
        status_text: String,
        body: Option<String>,
    },

    /// The request could not be serialized.
    #[error("encode error: {0}")]
    Encode(#[source] serde_json::Error),

    /// Response body could not be parsed as the expected format.
    #[error("decode error: {0}")]
    Decode(#[source] Box<dyn StdError + Send + Sync>),

    /// The cancellation token fired before the exchange completed.
    #[error("verification cancelled")]
    Cancelled,

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl VerifyError {
    /// `true` when the exchange itself failed: no response, or a non-2xx one.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_) | Self::HttpStatus { .. })
    }
}

#[derive(Debug, Clone)]
/// Builder for [`VerificationClient`].
///
/// Use this when you need to customize the endpoint URLs, timeout, or user-agent.
pub struct VerificationClientBuilder {
    production_url: String,
    sandbox_url: String,
    endpoint: Endpoint,
    auto_fix: bool,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl Default for VerificationClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationClientBuilder {
    /// Create a builder targeting production with auto-fix armed and no timeout.
    pub fn new() -> Self {
        Self {
            production_url: DEFAULT_PRODUCTION_ENDPOINT.to_owned(),
            sandbox_url: DEFAULT_SANDBOX_ENDPOINT.to_owned(),
            endpoint: Endpoint::Production,
            auto_fix: true,
            timeout: None,
            user_agent: None,
        }
    }

    /// Create a builder from environment variables.
    ///
    /// | Variable | Description |
    /// |----------|-------------|
    /// | `STOREKIT_ENVIRONMENT` | Initial endpoint: `production` or `sandbox` |
    /// | `STOREKIT_PRODUCTION_URL` | Production verification URL override |
    /// | `STOREKIT_SANDBOX_URL` | Sandbox verification URL override |
    /// | `STOREKIT_AUTO_FIX` | `0` or `false` disarms the environment auto-fix |
    /// | `STOREKIT_TIMEOUT_SECS` | Whole-request timeout in seconds |
    pub fn from_env() -> Result<Self, ValidationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ValidationError> {
        let mut builder = Self::new();
        if let Some(endpoint) = lookup("STOREKIT_ENVIRONMENT") {
            builder.endpoint = endpoint.parse()?;
        }
        if let Some(url) = lookup("STOREKIT_PRODUCTION_URL") {
            builder.production_url = url;
        }
        if let Some(url) = lookup("STOREKIT_SANDBOX_URL") {
            builder.sandbox_url = url;
        }
        if let Some(auto_fix) = lookup("STOREKIT_AUTO_FIX") {
            builder.auto_fix = !(auto_fix == "0" || auto_fix.eq_ignore_ascii_case("false"));
        }
        if let Some(secs) = lookup("STOREKIT_TIMEOUT_SECS") {
            match secs.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => builder.timeout = Some(Duration::from_secs(secs)),
                _ => debug!(value = %secs, "ignoring STOREKIT_TIMEOUT_SECS"),
            }
        }
        Ok(builder)
    }

    /// Override the production verification URL.
    pub fn production_url(mut self, url: impl Into<String>) -> Self {
        self.production_url = url.into();
        self
    }

    /// Override the sandbox verification URL.
    pub fn sandbox_url(mut self, url: impl Into<String>) -> Self {
        self.sandbox_url = url.into();
        self
    }

    /// Select the endpoint the first attempt goes to.
    pub fn endpoint(mut self, endpoint: Endpoint) -> Self {
        self.endpoint = endpoint;
        self
    }

    /// Arm or disarm the environment auto-fix.
    pub fn auto_fix(mut self, enabled: bool) -> Self {
        self.auto_fix = enabled;
        self
    }

    /// Set an HTTP client timeout applied to each attempt.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Build a [`VerificationClient`].
    ///
    /// Fails with [`VerifyError::Validation`] when a URL override does not parse.
    pub fn build(self) -> Result<VerificationClient, VerifyError> {
        let production_url = parse_endpoint_url("production_url", &self.production_url)?;
        let sandbox_url = parse_endpoint_url("sandbox_url", &self.sandbox_url)?;

        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| VerifyError::Transport(Box::new(err)))?;

        Ok(VerificationClient {
            production_url,
            sandbox_url,
            endpoint: self.endpoint,
            auto_fix_armed: self.auto_fix,
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

fn parse_endpoint_url(field: &'static str, value: &str) -> Result<String, ValidationError> {
    url::Url::parse(value.trim())
        .map(String::from)
        .map_err(|_| ValidationError::InvalidUrl {
            field,
            input: value.to_owned(),
        })
}

#[derive(Clone)]
/// Receipt verification client.
///
/// Holds the active [`Endpoint`] and the auto-fix flag. The flag starts armed
/// and is consumed by the first `verify` call that decodes a response, whatever
/// its status; it stays cleared for the life of this instance. A clone carries
/// its own copy of both and shares the HTTP connection pool.
///
/// By default it uses:
/// - `https://buy.itunes.apple.com/verifyReceipt` for production
/// - `https://sandbox.itunes.apple.com/verifyReceipt` for sandbox
pub struct VerificationClient {
    production_url: String,
    sandbox_url: String,
    endpoint: Endpoint,
    auto_fix_armed: bool,
    http: Arc<dyn HttpTransport>,
}

impl Default for VerificationClient {
    fn default() -> Self {
        Self::new()
    }
}

impl VerificationClient {
    /// Create a client targeting production with auto-fix armed.
    ///
    /// For more customization, use [`VerificationClient::builder`].
    pub fn new() -> Self {
        Self {
            production_url: DEFAULT_PRODUCTION_ENDPOINT.to_owned(),
            sandbox_url: DEFAULT_SANDBOX_ENDPOINT.to_owned(),
            endpoint: Endpoint::Production,
            auto_fix_armed: true,
            http: Arc::new(ReqwestTransport {
                client: reqwest::Client::new(),
            }),
        }
    }

    /// Start building a client with custom settings.
    pub fn builder() -> VerificationClientBuilder {
        VerificationClientBuilder::new()
    }

    /// Post subsequent receipts to the sandbox.
    pub fn use_sandbox(mut self) -> Self {
        self.endpoint = Endpoint::Sandbox;
        self
    }

    /// Post subsequent receipts to production.
    pub fn use_production(mut self) -> Self {
        self.endpoint = Endpoint::Production;
        self
    }

    /// Disarm the environment auto-fix.
    pub fn disable_auto_fix(mut self) -> Self {
        self.auto_fix_armed = false;
        self
    }

    /// The endpoint the next attempt goes to.
    pub fn endpoint(&self) -> Endpoint {
        self.endpoint
    }

    /// Whether the next decoded response may still trigger a resubmission.
    pub fn is_auto_fix_armed(&self) -> bool {
        self.auto_fix_armed
    }

    /// Verify a receipt.
    ///
    /// If auto-fix is armed it is consumed here. A `21007` from production or a
    /// `21008` from the sandbox then switches the endpoint and resubmits once;
    /// the returned response is the second attempt's. The switch persists on
    /// this client only when that second attempt succeeds.
    ///
    /// Errors:
    /// - [`VerifyError::Transport`] / [`VerifyError::HttpStatus`] when the exchange fails,
    /// - [`VerifyError::Decode`] when the body is not a verification response,
    /// - [`VerifyError::Cancelled`] when `cancel` fires first.
    ///
    /// None of them are retried, and none of them change the endpoint. A failed
    /// resubmission still leaves auto-fix consumed.
    pub async fn verify(
        &mut self,
        request: &VerificationRequest,
        cancel: &CancellationToken,
    ) -> Result<VerificationResponse, VerifyError> {
        let body = crate::transport::encode_verify_receipt_json(request)
            .map_err(VerifyError::Encode)?;

        let response = self.attempt(self.endpoint, &body, cancel).await?;

        if !std::mem::take(&mut self.auto_fix_armed) {
            return Ok(response);
        }

        let Some(target) = auto_fix_target(response.status, self.endpoint) else {
            debug!(
                status = response.status.as_i32(),
                endpoint = %self.endpoint,
                "auto-fix consumed without resubmission"
            );
            return Ok(response);
        };

        info!(
            status = response.status.as_i32(),
            from = %self.endpoint,
            to = %target,
            "receipt sent to the wrong environment, resubmitting"
        );
        let response = self.attempt(target, &body, cancel).await?;
        self.endpoint = target;
        Ok(response)
    }

    async fn attempt(
        &self,
        endpoint: Endpoint,
        body: &[u8],
        cancel: &CancellationToken,
    ) -> Result<VerificationResponse, VerifyError> {
        let url = self.url_for(endpoint);
        debug!(endpoint = %endpoint, url = %url, "posting receipt for verification");

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(VerifyError::Cancelled),
            result = self.http.post_json(url, body.to_vec()) => {
                result.map_err(VerifyError::Transport)?
            }
        };

        if !(200..=299).contains(&response.status) {
            let body = String::from_utf8_lossy(&response.body);
            let body = if body.trim().is_empty() {
                None
            } else {
                Some(body.into_owned())
            };
            return Err(VerifyError::HttpStatus {
                status: response.status,
                status_text: response.status_text,
                body,
            });
        }

        crate::transport::decode_verify_receipt_json_response(response.body)
            .map_err(|err| VerifyError::Decode(Box::new(err)))
    }

    fn url_for(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Production => &self.production_url,
            Endpoint::Sandbox => &self.sandbox_url,
        }
    }
}

/// Endpoint to resubmit to, if `status` says the receipt went to the wrong one.
fn auto_fix_target(status: StatusCode, endpoint: Endpoint) -> Option<Endpoint> {
    match (status.known(), endpoint) {
        (Some(KnownStatusCode::SandboxReceiptSentToProduction), Endpoint::Production)
        | (Some(KnownStatusCode::ProductionReceiptSentToSandbox), Endpoint::Sandbox) => {
            Some(endpoint.other())
        }
        _ => None,
    }
}

/// Decode an App Store server notification body.
///
/// No signature checks are performed.
pub fn parse_notification(body: &str) -> Result<Notification, VerifyError> {
    crate::transport::decode_notification_json(body)
        .map_err(|err| VerifyError::Decode(Box::new(err)))
}
