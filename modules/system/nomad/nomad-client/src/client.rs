use std::sync::Arc;
use std::time::Duration;

use http::{HeaderValue, Method};
use nomad_sdk::{Arguments, CallOptions, NomadClientV1, NomadError, Output};
use secrecy::{ExposeSecret, SecretString};
use tokio::time::{Instant, timeout_at};
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::catalog::{self, PARSE_JOB};
use crate::decode::decode;
use crate::operation::{BodySpec, Effect, Operation};
use crate::request::Request;
use crate::resolve::{json_job, resolve_request};
use crate::response::RawResponse;
use crate::token::TokenCell;
use crate::transport::{ReqwestTransport, Transport};
use crate::validate::{ArgValue, ValidatedArgs, validate};

/// Per-request timeout; a call deadline may only tighten it.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Agent address used when `NOMAD_ADDR` is unset.
pub const DEFAULT_ADDRESS: &str = "http://127.0.0.1:4646";

/// Header carrying the ACL secret.
pub const TOKEN_HEADER: &str = "x-nomad-token";

/// Endpoint used for the construction-time health probe.
pub const PROBE_PATH: &str = "/v1/status/leader";

const ADDRESS_ENV: &str = "NOMAD_ADDR";
const TOKEN_ENV: &str = "NOMAD_TOKEN";

/// Configuration for [`NomadClient`]
#[derive(Debug)]
pub struct NomadClientConfig {
    pub address: String,
    pub token: Option<SecretString>,
}

impl NomadClientConfig {
    /// Configuration for an agent at `address`, optionally authenticated.
    #[must_use]
    pub fn remote(address: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            address: address.into(),
            token,
        }
    }

    /// Create configuration from environment variables
    ///
    /// Reads:
    /// - `NOMAD_ADDR`: agent address (default: `http://127.0.0.1:4646`)
    /// - `NOMAD_TOKEN`: ACL secret (optional; empty means unauthenticated)
    #[must_use]
    pub fn from_env() -> Self {
        let address = std::env::var(ADDRESS_ENV)
            .ok()
            .filter(|address| !address.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ADDRESS.to_owned());
        let token = std::env::var(TOKEN_ENV)
            .ok()
            .filter(|token| !token.is_empty())
            .map(|token| SecretString::new(token.into_boxed_str()));

        Self::remote(address, token)
    }
}

/// Nomad API adapter.
///
/// One instance per process; share it behind an [`Arc`]. Every call resolves
/// the named catalog operation into a request, sends it through the
/// transport and decodes the reply. Each call, including any HCL pre-parse,
/// completes within [`DEFAULT_TIMEOUT`].
pub struct NomadClient {
    base_url: Url,
    token: TokenCell,
    transport: Arc<dyn Transport>,
}

impl std::fmt::Debug for NomadClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NomadClient")
            .field("base_url", &self.base_url.as_str())
            .field("token", &self.token)
            .finish_non_exhaustive()
    }
}

impl NomadClient {
    /// Connect to the agent over HTTP and verify it is reachable.
    ///
    /// # Errors
    /// Returns [`NomadError::Connection`] for a malformed address or a failed
    /// health probe.
    pub async fn connect(config: NomadClientConfig) -> Result<Self, NomadError> {
        let transport = ReqwestTransport::new(DEFAULT_TIMEOUT)?;
        Self::with_transport(config, Arc::new(transport)).await
    }

    /// Build a client over an arbitrary transport; the health probe still runs.
    ///
    /// # Errors
    /// See [`NomadClient::connect`].
    pub async fn with_transport(
        config: NomadClientConfig,
        transport: Arc<dyn Transport>,
    ) -> Result<Self, NomadError> {
        let base_url = parse_address(&config.address)?;
        let client = Self {
            base_url,
            token: TokenCell::new(config.token),
            transport,
        };
        client.probe().await?;
        Ok(client)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Snapshot of the current auth token.
    #[must_use]
    pub fn token(&self) -> Option<Arc<SecretString>> {
        self.token.load()
    }

    /// Replace the auth token; `None` or an empty secret clears it.
    pub fn set_token(&self, token: Option<SecretString>) {
        self.token.set(token);
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_set()
    }

    /// Invoke a catalog operation with default call options.
    ///
    /// # Errors
    /// See [`NomadClient::invoke_with`].
    pub async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Output, NomadError> {
        self.invoke_with(operation, args, CallOptions::default()).await
    }

    /// Validate, resolve, execute and decode one operation.
    ///
    /// # Errors
    /// - [`NomadError::Validation`] for an unknown operation or bad arguments
    ///   (nothing is sent)
    /// - [`NomadError::Connection`] when no response was obtained
    /// - [`NomadError::Api`] for a status >= 400
    /// - [`NomadError::Decode`] when the body does not match the result shape
    /// - [`NomadError::Cancelled`] when `options.cancel` fires first
    #[instrument(name = "nomad.invoke", skip(self, args, options), fields(operation = name))]
    pub async fn invoke_with(
        &self,
        name: &str,
        args: &Arguments,
        options: CallOptions,
    ) -> Result<Output, NomadError> {
        let operation = catalog::find(name).ok_or_else(|| {
            NomadError::validation("operation", format!("unknown operation '{name}'"))
        })?;
        let validated = validate(operation, args)?;
        self.run(operation, validated, &options).await
    }

    async fn run(
        &self,
        operation: &Operation,
        mut args: ValidatedArgs,
        options: &CallOptions,
    ) -> Result<Output, NomadError> {
        let deadline = call_deadline(options);
        if operation.body == BodySpec::JobRegister {
            self.parse_hcl_job(&mut args, deadline, options).await?;
        }

        let request = resolve_request(operation, &args)?;
        let response = self.execute(request, deadline, options).await?;
        let output = decode(&operation.result, response.body(), &args)?;

        if operation.effect == Effect::InstallToken {
            self.install_token(&output);
        }
        Ok(output)
    }

    /// Swap an HCL `job_spec` for the JSON job returned by the agent's parser.
    async fn parse_hcl_job(
        &self,
        args: &mut ValidatedArgs,
        deadline: Instant,
        options: &CallOptions,
    ) -> Result<(), NomadError> {
        let Some(spec) = args.str("job_spec") else {
            return Ok(());
        };
        if json_job(spec)?.is_some() {
            return Ok(());
        }

        debug!("job specification is not JSON; parsing remotely");
        let mut parse_args = ValidatedArgs::default();
        parse_args.insert("job_spec", ArgValue::Str(spec.to_owned()));
        parse_args.insert("canonicalize", ArgValue::Bool(true));

        let request = resolve_request(&PARSE_JOB, &parse_args)?;
        let job: serde_json::Value = self.execute(request, deadline, options).await?.json()?;
        args.insert("job_spec", ArgValue::Json(job));
        Ok(())
    }

    fn install_token(&self, output: &Output) {
        match output {
            Output::AclToken(token) if !token.secret_id.is_empty() => {
                let secret = SecretString::new(token.secret_id.clone().into_boxed_str());
                self.token.set(Some(secret));
                info!(accessor_id = %token.accessor_id, "installed bootstrap token");
            }
            _ => warn!("bootstrap response carried no secret; token unchanged"),
        }
    }

    /// Attach auth and send, honouring cancellation. The request must answer
    /// before `deadline`.
    async fn execute(
        &self,
        mut request: Request,
        deadline: Instant,
        options: &CallOptions,
    ) -> Result<RawResponse, NomadError> {
        let remaining = deadline.saturating_duration_since(Instant::now());
        request.set_timeout(remaining);

        if let Some(token) = self.token.load() {
            let mut value = HeaderValue::from_str(token.expose_secret()).map_err(|_| {
                NomadError::validation("token", "contains characters not allowed in a header")
            })?;
            value.set_sensitive(true);
            request.headers_mut().insert(TOKEN_HEADER, value);
        }

        let method = request.method().clone();
        let path = request.path().to_owned();
        debug!(%method, %path, "sending request");

        let exchange = timeout_at(deadline, self.transport.send(&self.base_url, request));
        let outcome = match &options.cancel {
            Some(cancel) => tokio::select! {
                biased;
                () = cancel.cancelled() => return Err(NomadError::Cancelled),
                outcome = exchange => outcome,
            },
            None => exchange.await,
        };
        let response = outcome.map_err(|_| {
            NomadError::connection(format!(
                "{method} {path}: no response within {}s",
                remaining.as_secs_f64()
            ))
        })??;

        debug!(%method, %path, status = response.status().as_u16(), "received response");
        response.error_for_status()
    }

    /// Any answer below 500 means the agent is reachable; ACL-protected
    /// agents may reject the probe itself with 403.
    async fn probe(&self) -> Result<(), NomadError> {
        let request = Request::builder()
            .method(Method::GET)
            .path(PROBE_PATH)
            .build()?;

        let deadline = Instant::now() + DEFAULT_TIMEOUT;
        match self.execute(request, deadline, &CallOptions::default()).await {
            Ok(_) => Ok(()),
            Err(NomadError::Api { status, .. }) if !status.is_server_error() => Ok(()),
            Err(NomadError::Api { status, body }) => {
                warn!(address = %self.base_url, %status, "health probe failed");
                Err(NomadError::connection(format!(
                    "health probe to {} returned {status}: {}",
                    self.base_url,
                    String::from_utf8_lossy(&body)
                )))
            }
            Err(err) => {
                warn!(address = %self.base_url, error = %err, "health probe failed");
                Err(NomadError::connection_caused_by(
                    format!("agent at {} is unreachable", self.base_url),
                    err,
                ))
            }
        }
    }
}

#[async_trait::async_trait]
impl NomadClientV1 for NomadClient {
    async fn invoke_with(
        &self,
        operation: &str,
        args: &Arguments,
        options: CallOptions,
    ) -> Result<Output, NomadError> {
        NomadClient::invoke_with(self, operation, args, options).await
    }
}

/// One deadline per call; a caller deadline may only tighten the default.
fn call_deadline(options: &CallOptions) -> Instant {
    let budget = options
        .deadline
        .map_or(DEFAULT_TIMEOUT, |deadline| deadline.min(DEFAULT_TIMEOUT));
    Instant::now() + budget
}

fn parse_address(address: &str) -> Result<Url, NomadError> {
    let address = address.trim();
    if address.is_empty() {
        return Err(NomadError::connection("agent address is empty"));
    }
    let url = Url::parse(address).map_err(|e| {
        NomadError::connection_caused_by(format!("invalid agent address '{address}'"), e)
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(NomadError::connection(format!(
            "unsupported scheme '{other}' in agent address '{address}'"
        ))),
    }
}
