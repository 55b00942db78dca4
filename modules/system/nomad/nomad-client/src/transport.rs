use std::time::Duration;

use async_trait::async_trait;
use nomad_sdk::NomadError;
use url::Url;

use crate::request::Request;
use crate::response::RawResponse;

/// Sends one resolved request to the agent and buffers the reply.
///
/// Implementations report every failure to obtain a response as
/// [`NomadError::Connection`]; status classification happens in the client.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, base_url: &Url, request: Request) -> Result<RawResponse, NomadError>;
}

/// HTTP transport backed by a single shared `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a new transport with a fixed per-request timeout
    ///
    /// # Errors
    /// Returns [`NomadError::Connection`] if the HTTP client cannot be built
    /// (e.g. the TLS backend fails to initialise).
    pub fn new(timeout: Duration) -> Result<Self, NomadError> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| NomadError::connection_caused_by("failed to build HTTP client", e))?;

        Ok(Self { http_client })
    }
}

/// Join the agent's base URL with an absolute API path, keeping any path
/// prefix the base URL carries (reverse-proxied agents).
pub(crate) fn endpoint(base_url: &Url, path: &str) -> Result<Url, NomadError> {
    let joined = format!("{}{}", base_url.as_str().trim_end_matches('/'), path);
    Url::parse(&joined)
        .map_err(|e| NomadError::connection_caused_by(format!("invalid request URL '{joined}'"), e))
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, base_url: &Url, request: Request) -> Result<RawResponse, NomadError> {
        let url = endpoint(base_url, request.path())?;
        let target = format!("{} {}", request.method(), request.path());

        let mut req_builder = self
            .http_client
            .request(request.method().clone(), url)
            .headers(request.headers().clone());

        if !request.query().is_empty() {
            req_builder = req_builder.query(request.query());
        }

        if let Some(timeout) = request.timeout() {
            req_builder = req_builder.timeout(timeout);
        }

        if let Some(body) = request.body() {
            req_builder = req_builder.json(body);
        }

        let resp = req_builder.send().await.map_err(|e| {
            if e.is_timeout() {
                NomadError::connection_caused_by(format!("{target}: request timed out"), e)
            } else if e.is_connect() {
                NomadError::connection_caused_by(format!("{target}: connection failed"), e)
            } else {
                NomadError::connection_caused_by(format!("{target}: request failed"), e)
            }
        })?;

        let status = resp.status();
        let body = resp.bytes().await.map_err(|e| {
            NomadError::connection_caused_by(format!("{target}: failed to read response body"), e)
        })?;

        Ok(RawResponse::new(status, body))
    }
}
