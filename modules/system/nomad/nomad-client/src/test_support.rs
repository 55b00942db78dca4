//! In-memory [`Transport`] for tests: canned responses per route and a log
//! of every request that reached the wire.

use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use http::{Method, StatusCode};
use nomad_sdk::NomadError;
use parking_lot::Mutex;
use url::Url;

use crate::client::PROBE_PATH;
use crate::request::Request;
use crate::response::RawResponse;
use crate::transport::Transport;

struct Route {
    method: Method,
    path: String,
    status: StatusCode,
    body: Bytes,
}

/// Records requests and answers from a route table.
///
/// `GET /v1/status/leader` answers `200` out of the box so the client's
/// health probe succeeds; unknown routes answer `404`.
pub struct RecordingTransport {
    routes: Mutex<Vec<Route>>,
    requests: Mutex<Vec<Request>>,
    delay: Mutex<Option<Duration>>,
    unreachable: Mutex<bool>,
}

impl Default for RecordingTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingTransport {
    #[must_use]
    pub fn new() -> Self {
        let transport = Self {
            routes: Mutex::new(Vec::new()),
            requests: Mutex::new(Vec::new()),
            delay: Mutex::new(None),
            unreachable: Mutex::new(false),
        };
        transport.respond(Method::GET, PROBE_PATH, 200, r#""127.0.0.1:4647""#);
        transport
    }

    /// Sleep this long before answering each request; `None` answers at once.
    pub fn set_delay(&self, delay: Option<Duration>) {
        *self.delay.lock() = delay;
    }

    /// Fail every request with a connection error.
    pub fn set_unreachable(&self, unreachable: bool) {
        *self.unreachable.lock() = unreachable;
    }

    /// Answer `method path` with `status` and `body`. Later routes win.
    /// Out-of-range status codes answer `500`.
    pub fn respond(&self, method: Method, path: &str, status: u16, body: impl Into<Bytes>) {
        let status = StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        self.routes.lock().push(Route {
            method,
            path: path.to_owned(),
            status,
            body: body.into(),
        });
    }

    pub fn respond_json(
        &self,
        method: Method,
        path: &str,
        status: u16,
        body: &serde_json::Value,
    ) {
        self.respond(method, path, status, body.to_string());
    }

    /// Every request sent so far, the probe included.
    #[must_use]
    pub fn requests(&self) -> Vec<Request> {
        self.requests.lock().clone()
    }

    #[must_use]
    pub fn last_request(&self) -> Option<Request> {
        self.requests.lock().last().cloned()
    }

    #[must_use]
    pub fn calls(&self) -> usize {
        self.requests.lock().len()
    }

    /// Forget recorded requests (routes are kept).
    pub fn clear(&self) {
        self.requests.lock().clear();
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn send(&self, _base_url: &Url, request: Request) -> Result<RawResponse, NomadError> {
        let method = request.method().clone();
        let path = request.path().to_owned();
        self.requests.lock().push(request);

        let delay = *self.delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if *self.unreachable.lock() {
            return Err(NomadError::connection(format!(
                "{method} {path}: connection refused"
            )));
        }

        let routes = self.routes.lock();
        let answer = routes
            .iter()
            .rev()
            .find(|route| route.method == method && route.path == path)
            .map_or_else(
                || (StatusCode::NOT_FOUND, Bytes::from_static(b"no route")),
                |route| (route.status, route.body.clone()),
            );

        Ok(RawResponse::new(answer.0, answer.1))
    }
}
