//! Nomad API adapter
//!
//! Turns a named operation plus a JSON argument mapping into one HTTP call
//! against a Nomad agent and returns the decoded result:
//!
//! - [`catalog`] lists every operation as data (verb, path template,
//!   namespace routing, argument schema, body, result mode)
//! - [`validate()`] checks caller arguments against that schema before any
//!   network access
//! - [`resolve_request`] renders the path, namespace, pagination, filter and
//!   body into a [`Request`]
//! - [`NomadClient`] attaches the auth token, sends the request through a
//!   [`Transport`] and decodes the reply into an [`Output`]
//!
//! # Examples
//!
//! ```no_run
//! use nomad_client::{Arguments, NomadClient, NomadClientConfig};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = NomadClient::connect(NomadClientConfig::from_env()).await?;
//!
//! let args: Arguments =
//!     serde_json::from_value(json!({"namespace": "billing", "status": "running"}))?;
//! let jobs = client.invoke("list_jobs", &args).await?;
//! println!("{}", jobs.to_text()?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Bootstrapping ACLs
//!
//! ```no_run
//! use nomad_client::{Arguments, NomadClient, NomadClientConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = NomadClientConfig::remote("http://127.0.0.1:4646", None);
//! let client = NomadClient::connect(config).await?;
//!
//! // The issued secret is installed on the client for every later call.
//! client.invoke("bootstrap_acl_token", &Arguments::new()).await?;
//! assert!(client.is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
mod client;
mod decode;
pub mod operation;
mod request;
mod resolve;
mod response;
mod token;
mod transport;
pub mod validate;

#[cfg(feature = "test-utils")]
pub mod test_support;

pub use client::{
    DEFAULT_ADDRESS, DEFAULT_TIMEOUT, NomadClient, NomadClientConfig, PROBE_PATH, TOKEN_HEADER,
};
pub use decode::decode;
pub use operation::{Operation, ResultMode};
pub use request::{Request, RequestBuilder};
pub use resolve::{API_PREFIX, json_job, resolve_request};
pub use response::RawResponse;
pub use transport::{ReqwestTransport, Transport};
pub use validate::{ValidatedArgs, validate};

// Re-export the contract so callers need a single dependency
pub use http::{Method, StatusCode};
pub use nomad_sdk::{Arguments, CallOptions, NomadClientV1, NomadError, Output};
