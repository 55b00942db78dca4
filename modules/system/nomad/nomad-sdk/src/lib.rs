//! Nomad adapter SDK
//!
//! Contract shared by the adapter implementation and its callers:
//!
//! - [`NomadClientV1`]: `invoke(operation, args)` entry point
//! - [`NomadError`]: validation / connection / API / decode taxonomy
//! - [`Output`]: decoded result or passthrough text
//! - [`models`]: typed shapes of the agent's JSON responses

pub mod api;
pub mod error;
pub mod models;
pub mod output;

pub use api::{Arguments, CallOptions, NomadClientV1};
pub use error::{BoxError, NomadError};
pub use output::Output;
