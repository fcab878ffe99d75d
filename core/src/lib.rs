//! Synchronous API client for a host-monitoring agent.
//!
//! # Overview
//! `MonitorClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network; `Session` wires a client to an
//! `HttpTransport` and a `SessionSink` for callers that want the whole
//! round trip handled.
//!
//! # Design
//! - `MonitorClient` is stateless — it holds only the base URL and the
//!   auth token, both explicit constructor arguments.
//! - Each endpoint is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - A 401 or 302 on any response means the session is invalid: the call
//!   fails with `ApiError::Unauthorized` and, through `Session`, the
//!   injected sink fires once.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod error;
pub mod format;
pub mod http;
pub mod session;
pub mod transport;
pub mod types;

pub use client::{MonitorClient, RequestOptions};
pub use error::{ApiError, TransportError};
pub use format::format_bytes;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use session::{CallbackSink, IgnoreSession, Session, SessionSink};
#[cfg(feature = "ureq-transport")]
pub use transport::UreqTransport;
pub use transport::HttpTransport;
pub use types::{
    ActionReply, Alert, AlertRule, AppConfig, HistoryRange, HostMetrics, LogFile, LogQuery,
    LogResult, LogTarget, MetricKind, MetricPoint, NewAlertRule, ProcessInfo, ServiceAction,
    ServiceLogs, ServiceStatus, StatusReply,
};
