use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::error::NomadError;
use crate::output::Output;

/// Caller-supplied argument mapping. Numbers arrive as JSON numbers and are
/// truncated where the operation expects an integer.
pub type Arguments = serde_json::Map<String, serde_json::Value>;

/// Per-call controls propagated into the outgoing HTTP request.
#[derive(Debug, Clone, Default)]
pub struct CallOptions {
    /// Abandons the in-flight request when cancelled.
    pub cancel: Option<CancellationToken>,
    /// Budget for the whole call, pre-steps included. Values above the
    /// client's fixed timeout are capped to it.
    pub deadline: Option<Duration>,
}

impl CallOptions {
    #[must_use]
    pub fn with_cancel(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    #[must_use]
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Public API trait for the Nomad adapter (Version 1).
///
/// The front end hands over an operation name plus an argument mapping and
/// gets back an [`Output`] or a [`NomadError`].
#[async_trait::async_trait]
pub trait NomadClientV1: Send + Sync {
    /// Invoke a catalog operation with default call options.
    ///
    /// # Errors
    /// See [`NomadClientV1::invoke_with`].
    async fn invoke(&self, operation: &str, args: &Arguments) -> Result<Output, NomadError> {
        self.invoke_with(operation, args, CallOptions::default()).await
    }

    /// Invoke a catalog operation with explicit cancellation/deadline.
    ///
    /// # Errors
    /// Returns the [`NomadError`] variant matching the failure; nothing is
    /// retried.
    async fn invoke_with(
        &self,
        operation: &str,
        args: &Arguments,
        options: CallOptions,
    ) -> Result<Output, NomadError>;
}
