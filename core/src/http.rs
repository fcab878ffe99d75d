//! HTTP transport types shared by the builder and executor layers.
//!
//! # Design
//! Requests and responses are plain data. `MonitorClient` builds
//! `HttpRequest` values and parses `HttpResponse` values without touching
//! the network; executing the round trip is the transport's job. This
//! separation keeps the client deterministic and testable against
//! hand-written responses.
//!
//! All fields use owned types (`String`, `Vec`) so values can be moved
//! freely between the builder, a transport running elsewhere, and tests.

/// Header carrying the agent credential on every request.
pub const HEADER_AUTH_TOKEN: &str = "X-Auth-Token";
/// Content type header name.
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
/// JSON content type sent by default.
pub const APPLICATION_JSON: &str = "application/json";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

/// An HTTP request described as plain data.
///
/// Built by `MonitorClient::build_*` methods. A transport executes it
/// against the network and returns the corresponding `HttpResponse`.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub path: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First value for `name`, compared ASCII case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// An HTTP response described as plain data.
///
/// Constructed by a transport after executing an `HttpRequest`, then passed
/// to `MonitorClient::parse_*` methods. `status_text` is the reason phrase
/// the server (or transport) reported; it feeds API error messages.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    /// Whether the status is in the 2xx success range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
