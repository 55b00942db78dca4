use std::time::Duration;

use http::{HeaderMap, Method};
use nomad_sdk::NomadError;
use serde_json::Value;

/// Fully resolved HTTP request, relative to the agent's base URL.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    path: String,
    query: Vec<(String, String)>,
    headers: HeaderMap,
    body: Option<Value>,
    timeout: Option<Duration>,
}

impl Request {
    /// Create a new request builder
    #[must_use]
    pub fn builder() -> RequestBuilder {
        RequestBuilder::default()
    }

    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Absolute path, always starting with `/v1/`.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Query pairs in the order they are sent. Flags carry an empty value.
    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }

    /// Value of the first query pair named `key`.
    #[must_use]
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// JSON body, if any.
    #[must_use]
    pub fn body(&self) -> Option<&Value> {
        self.body.as_ref()
    }

    /// Time left for this request; set by the client before sending.
    #[must_use]
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = Some(timeout);
    }
}

/// Builder for constructing requests with a fluent API
#[derive(Debug, Default)]
pub struct RequestBuilder {
    method: Option<Method>,
    path: Option<String>,
    query: Vec<(String, String)>,
    body: Option<Value>,
}

impl RequestBuilder {
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    #[must_use]
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Append a query pair; values are encoded by the transport.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set a JSON body; `Content-Type` is added by the transport.
    #[must_use]
    pub fn json(mut self, value: Value) -> Self {
        self.body = Some(value);
        self
    }

    /// Build the request
    ///
    /// # Errors
    /// Returns [`NomadError::Validation`] when no path was set.
    pub fn build(self) -> Result<Request, NomadError> {
        let method = self.method.unwrap_or(Method::GET);
        let path = self
            .path
            .ok_or_else(|| NomadError::validation("path", "request path is required"))?;

        Ok(Request {
            method,
            path,
            query: self.query,
            headers: HeaderMap::new(),
            body: self.body,
            timeout: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn builder_defaults_to_get() {
        let request = Request::builder().path("/v1/jobs").build().unwrap();
        assert_eq!(request.method(), Method::GET);
        assert!(request.body().is_none());
        assert!(request.query().is_empty());
    }

    #[test]
    fn builder_requires_path() {
        let err = Request::builder().method(Method::POST).build().unwrap_err();
        assert!(matches!(err, NomadError::Validation { ref field, .. } if field == "path"));
    }

    #[test]
    fn query_pairs_keep_order() {
        let request = Request::builder()
            .path("/v1/var/app")
            .query("namespace", "billing")
            .query("lock-acquire", "")
            .json(json!({"Path": "app"}))
            .build()
            .unwrap();
        assert_eq!(request.query_value("namespace"), Some("billing"));
        assert_eq!(request.query_value("lock-acquire"), Some(""));
        assert_eq!(request.query()[1].0, "lock-acquire");
        assert_eq!(request.body().unwrap()["Path"], "app");
    }

    #[test]
    fn built_request_has_no_headers_or_timeout() {
        let mut request = Request::builder().path("/v1/nodes").build().unwrap();
        assert!(request.headers().is_empty());
        assert_eq!(request.timeout(), None);

        request.set_timeout(Duration::from_secs(3));
        assert_eq!(request.timeout(), Some(Duration::from_secs(3)));
    }
}
