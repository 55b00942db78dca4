use bytes::Bytes;
use http::StatusCode;
use nomad_sdk::NomadError;
use serde::de::DeserializeOwned;

/// Buffered HTTP response as returned by a [`crate::Transport`].
#[derive(Clone)]
pub struct RawResponse {
    status: StatusCode,
    body: Bytes,
}

impl std::fmt::Debug for RawResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawResponse")
            .field("status", &self.status)
            .field("body_len", &self.body.len())
            .finish()
    }
}

impl RawResponse {
    #[must_use]
    pub fn new(status: StatusCode, body: Bytes) -> Self {
        Self { status, body }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Deserialize the body as JSON
    ///
    /// # Errors
    /// Returns [`NomadError::Decode`] when the body does not match `T`.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, NomadError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Turn a status >= 400 into [`NomadError::Api`], keeping the body verbatim.
    ///
    /// # Errors
    /// See above.
    pub fn error_for_status(self) -> Result<Self, NomadError> {
        if self.status.is_client_error() || self.status.is_server_error() {
            return Err(NomadError::Api {
                status: self.status,
                body: self.body,
            });
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(status: u16, body: &'static str) -> RawResponse {
        RawResponse::new(
            StatusCode::from_u16(status).unwrap(),
            Bytes::from_static(body.as_bytes()),
        )
    }

    #[test]
    fn success_passes_through() {
        let ok = response(200, "[]").error_for_status().unwrap();
        assert_eq!(ok.json::<Vec<u8>>().unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn error_status_keeps_body() {
        let err = response(403, "Permission denied").error_for_status().unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(err.body_text().as_deref(), Some("Permission denied"));
    }

    #[test]
    fn body_that_does_not_match_is_a_decode_error() {
        let raw = response(200, r#"{"ID": "web"}"#);
        assert!(matches!(raw.json::<Vec<String>>(), Err(NomadError::Decode(_))));
    }
}
