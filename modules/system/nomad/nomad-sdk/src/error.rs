use bytes::Bytes;
use http::StatusCode;
use thiserror::Error;

/// Boxed error type carried as the underlying cause of transport failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Error taxonomy for every Nomad adapter call.
///
/// None of these are retried by the adapter; all are returned to the caller
/// as the result of the invocation.
#[derive(Debug, Error)]
pub enum NomadError {
    /// An argument was missing, had the wrong kind, or held a value outside
    /// its allowed set. Raised before any network access.
    #[error("invalid argument '{field}': {reason}")]
    Validation { field: String, reason: String },

    /// The agent could not be reached (DNS, refused, timeout, malformed
    /// address, failed health probe).
    #[error("connection error: {detail}")]
    Connection {
        detail: String,
        #[source]
        source: Option<BoxError>,
    },

    /// The agent answered with a status >= 400. The body is kept verbatim.
    #[error("Nomad API error: status={status}: {}", String::from_utf8_lossy(body))]
    Api { status: StatusCode, body: Bytes },

    /// The response body did not match the declared result shape.
    #[error("decode error: {0}")]
    Decode(String),

    /// The caller cancelled the invocation before the response arrived.
    #[error("request cancelled")]
    Cancelled,
}

impl NomadError {
    #[must_use]
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn connection(detail: impl Into<String>) -> Self {
        Self::Connection {
            detail: detail.into(),
            source: None,
        }
    }

    #[must_use]
    pub fn connection_caused_by(detail: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Connection {
            detail: detail.into(),
            source: Some(source.into()),
        }
    }

    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection { .. })
    }

    /// Remote status code for [`NomadError::Api`].
    #[must_use]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Remote diagnostic body for [`NomadError::Api`], lossily decoded.
    #[must_use]
    pub fn body_text(&self) -> Option<String> {
        match self {
            Self::Api { body, .. } => Some(String::from_utf8_lossy(body).into_owned()),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NomadError {
    fn from(err: serde_json::Error) -> Self {
        NomadError::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_keeps_remote_body() {
        let err = NomadError::Api {
            status: StatusCode::NOT_FOUND,
            body: Bytes::from_static(br#"{"error":"not found"}"#),
        };
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert_eq!(err.body_text().as_deref(), Some(r#"{"error":"not found"}"#));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn validation_error_names_field() {
        let err = NomadError::validation("count", "required argument is missing");
        assert_eq!(
            err.to_string(),
            "invalid argument 'count': required argument is missing"
        );
        assert!(err.status().is_none());
    }

    #[test]
    fn connection_error_exposes_cause() {
        let io = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = NomadError::connection_caused_by("GET /v1/status/leader", io);
        assert!(err.is_connection());
        let source = std::error::Error::source(&err).map(ToString::to_string);
        assert_eq!(source.as_deref(), Some("refused"));
    }
}
