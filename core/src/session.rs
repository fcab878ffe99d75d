//! The executing layer: one request, one session check, one parse.
//!
//! # Design
//! A dashboard fetch couples three things: the HTTP round trip, the
//! 401/302 session check, and sending the user back through login when the
//! session has died. `Session` keeps that coupling but makes the pieces
//! injectable: the transport does the I/O and the `SessionSink` receives
//! the invalidation side effect, so the whole flow is testable without a
//! UI attached.

use serde::de::DeserializeOwned;

use crate::client::MonitorClient;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::HttpTransport;

/// Receiver for the session-invalidated side effect — typically a redirect
/// to the logout page. Embedders supply whatever that means in their
/// environment.
pub trait SessionSink: Send + Sync {
    fn session_invalidated(&self);
}

/// Adapter lifting a plain closure into a `SessionSink`.
pub struct CallbackSink<F>(pub F);

impl<F> SessionSink for CallbackSink<F>
where
    F: Fn() + Send + Sync,
{
    fn session_invalidated(&self) {
        (self.0)()
    }
}

/// Sink that drops the side effect. Callers matching on
/// `ApiError::Unauthorized` themselves use this.
pub struct IgnoreSession;

impl SessionSink for IgnoreSession {
    fn session_invalidated(&self) {}
}

/// A `MonitorClient` wired to a transport and a session sink.
///
/// `fetch` issues exactly one HTTP request per call. When the agent
/// reports the session invalid, the sink fires exactly once and the call
/// still fails with `ApiError::Unauthorized`: side effect and failure
/// signal both happen.
pub struct Session {
    client: MonitorClient,
    transport: Box<dyn HttpTransport>,
    sink: Box<dyn SessionSink>,
}

impl Session {
    pub fn new(
        client: MonitorClient,
        transport: Box<dyn HttpTransport>,
        sink: Box<dyn SessionSink>,
    ) -> Self {
        Self {
            client,
            transport,
            sink,
        }
    }

    /// The request builders live here.
    pub fn client(&self) -> &MonitorClient {
        &self.client
    }

    /// Execute `request` and return the raw response. Transport failures
    /// propagate; no status interpretation happens here.
    pub fn execute(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        Ok(self.transport.execute(request)?)
    }

    /// Execute `request` and interpret the response as JSON, reporting
    /// session invalidation through the sink.
    pub fn fetch<T: DeserializeOwned>(&self, request: HttpRequest) -> Result<T, ApiError> {
        let response = self.transport.execute(request)?;
        match self.client.parse_json(response) {
            Err(ApiError::Unauthorized) => {
                self.sink.session_invalidated();
                Err(ApiError::Unauthorized)
            }
            result => result,
        }
    }
}
