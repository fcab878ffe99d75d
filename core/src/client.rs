//! Stateless HTTP request builder and response parser for the monitor API.
//!
//! # Design
//! `MonitorClient` holds the agent's base URL and the auth token and carries
//! no mutable state between calls. Each endpoint is split into a `build_*`
//! method that produces an `HttpRequest` and a `parse_*` method that
//! consumes an `HttpResponse`. A transport executes the round trip in
//! between, keeping this layer deterministic and free of I/O dependencies.
//!
//! Every built request carries the `X-Auth-Token` and JSON content-type
//! defaults; caller-supplied headers override or extend them.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::json;
use tracing::warn;
use url::form_urlencoded;

use crate::error::ApiError;
use crate::http::{
    HttpMethod, HttpRequest, HttpResponse, APPLICATION_JSON, HEADER_AUTH_TOKEN,
    HEADER_CONTENT_TYPE,
};
use crate::types::{
    ActionReply, Alert, AlertRule, AppConfig, HistoryRange, HostMetrics, LogFile, LogQuery,
    LogResult, MetricKind, MetricPoint, NewAlertRule, ProcessInfo, ServiceAction, ServiceLogs,
    ServiceStatus, StatusReply,
};

/// Path prefix every endpoint lives under.
const API_BASE: &str = "/api";

/// Extra configuration merged into a built request.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Headers merged over the defaults. A name matching a default
    /// (ASCII case-insensitive) replaces it; anything else is appended.
    pub headers: Vec<(String, String)>,
    /// Raw body passed through unchanged.
    pub body: Option<String>,
}

/// Synchronous, stateless client for the monitor agent API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network. `Session` pairs it with a transport for callers
/// that want the round trip handled too.
#[derive(Debug, Clone)]
pub struct MonitorClient {
    base_url: String,
    auth_token: String,
}

impl MonitorClient {
    /// `base_url` is scheme/host/port only; the `/api` prefix is appended
    /// per request. `auth_token` is sent on every request.
    pub fn new(base_url: &str, auth_token: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.to_string(),
        }
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}{API_BASE}{endpoint}", self.base_url)
    }

    /// Build a request to `{base_url}/api{endpoint}` with the default
    /// headers merged with `options.headers`.
    pub fn build_request(
        &self,
        method: HttpMethod,
        endpoint: &str,
        options: RequestOptions,
    ) -> HttpRequest {
        let mut headers = vec![
            (HEADER_AUTH_TOKEN.to_string(), self.auth_token.clone()),
            (HEADER_CONTENT_TYPE.to_string(), APPLICATION_JSON.to_string()),
        ];
        for (name, value) in options.headers {
            match headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(&name)) {
                Some(slot) => slot.1 = value,
                None => headers.push((name, value)),
            }
        }
        HttpRequest {
            method,
            path: self.url(endpoint),
            headers,
            body: options.body,
        }
    }

    fn get(&self, endpoint: &str) -> HttpRequest {
        self.build_request(HttpMethod::Get, endpoint, RequestOptions::default())
    }

    fn with_json<T: Serialize>(
        &self,
        method: HttpMethod,
        endpoint: &str,
        payload: &T,
    ) -> Result<HttpRequest, ApiError> {
        let body =
            serde_json::to_string(payload).map_err(|e| ApiError::Serialization(e.to_string()))?;
        Ok(self.build_request(
            method,
            endpoint,
            RequestOptions {
                headers: Vec::new(),
                body: Some(body),
            },
        ))
    }

    /// Interpret a response: session check, success check, JSON decode.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_session(&response)?;
        if !response.is_success() {
            return Err(ApiError::Api {
                status: response.status,
                status_text: response.status_text,
            });
        }
        serde_json::from_str(&response.body).map_err(|e| ApiError::Deserialization(e.to_string()))
    }

    // --- metrics ---

    pub fn build_host_metrics(&self) -> HttpRequest {
        self.get("/metrics/host")
    }

    pub fn parse_host_metrics(&self, response: HttpResponse) -> Result<HostMetrics, ApiError> {
        self.parse_json(response)
    }

    pub fn build_metrics_history(&self, kind: MetricKind, range: HistoryRange) -> HttpRequest {
        self.get(&format!(
            "/metrics/history?type={}&range={}",
            kind.as_str(),
            range.as_str()
        ))
    }

    pub fn parse_metrics_history(
        &self,
        response: HttpResponse,
    ) -> Result<Vec<MetricPoint>, ApiError> {
        self.parse_json(response)
    }

    // --- processes ---

    pub fn build_processes(&self) -> HttpRequest {
        self.get("/processes")
    }

    pub fn parse_processes(&self, response: HttpResponse) -> Result<Vec<ProcessInfo>, ApiError> {
        self.parse_json(response)
    }

    pub fn build_kill_process(&self, pid: i32) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/processes/kill", &json!({ "pid": pid }))
    }

    pub fn parse_kill_process(&self, response: HttpResponse) -> Result<StatusReply, ApiError> {
        self.parse_json(response)
    }

    // --- apps and logs ---

    pub fn build_apps(&self) -> HttpRequest {
        self.get("/apps")
    }

    pub fn parse_apps(&self, response: HttpResponse) -> Result<Vec<AppConfig>, ApiError> {
        self.parse_json(response)
    }

    pub fn build_log_files(&self, app: &str, log: &str) -> HttpRequest {
        let mut qs = form_urlencoded::Serializer::new(String::new());
        qs.append_pair("app", app);
        qs.append_pair("log", log);
        self.get(&format!("/logs/files?{}", qs.finish()))
    }

    pub fn parse_log_files(&self, response: HttpResponse) -> Result<Vec<LogFile>, ApiError> {
        self.parse_json(response)
    }

    pub fn build_search_logs(&self, query: &LogQuery) -> HttpRequest {
        let mut qs = form_urlencoded::Serializer::new(String::new());
        if let Some(q) = &query.query {
            qs.append_pair("q", q);
        }
        qs.append_pair("app", &query.app);
        qs.append_pair("log", &query.log);
        if let Some(file) = &query.file {
            qs.append_pair("file", file);
        }
        if let Some(level) = &query.level {
            qs.append_pair("level", level);
        }
        if let Some(limit) = query.limit {
            qs.append_pair("limit", &limit.to_string());
        }
        self.get(&format!("/logs/search?{}", qs.finish()))
    }

    pub fn parse_search_logs(&self, response: HttpResponse) -> Result<Vec<LogResult>, ApiError> {
        self.parse_json(response)
    }

    // --- alerts ---

    pub fn build_alert_history(&self) -> HttpRequest {
        self.get("/alerts/history")
    }

    pub fn parse_alert_history(&self, response: HttpResponse) -> Result<Vec<Alert>, ApiError> {
        self.parse_json(response)
    }

    pub fn build_test_alert(&self) -> HttpRequest {
        self.build_request(HttpMethod::Post, "/alerts/test", RequestOptions::default())
    }

    pub fn parse_test_alert(&self, response: HttpResponse) -> Result<StatusReply, ApiError> {
        self.parse_json(response)
    }

    pub fn build_alert_rules(&self) -> HttpRequest {
        self.get("/alerts/rules")
    }

    pub fn parse_alert_rules(&self, response: HttpResponse) -> Result<Vec<AlertRule>, ApiError> {
        self.parse_json(response)
    }

    pub fn build_create_alert_rule(&self, rule: &NewAlertRule) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Post, "/alerts/rules", rule)
    }

    pub fn parse_create_alert_rule(&self, response: HttpResponse) -> Result<AlertRule, ApiError> {
        self.parse_json(response)
    }

    pub fn build_update_alert_rule(
        &self,
        id: &str,
        rule: &NewAlertRule,
    ) -> Result<HttpRequest, ApiError> {
        self.with_json(HttpMethod::Put, &format!("/alerts/rules/{id}"), rule)
    }

    pub fn parse_update_alert_rule(&self, response: HttpResponse) -> Result<AlertRule, ApiError> {
        self.parse_json(response)
    }

    pub fn build_delete_alert_rule(&self, id: &str) -> HttpRequest {
        self.build_request(
            HttpMethod::Delete,
            &format!("/alerts/rules/{id}"),
            RequestOptions::default(),
        )
    }

    pub fn parse_delete_alert_rule(&self, response: HttpResponse) -> Result<StatusReply, ApiError> {
        self.parse_json(response)
    }

    pub fn build_toggle_alert_rule(
        &self,
        id: &str,
        enabled: bool,
    ) -> Result<HttpRequest, ApiError> {
        self.with_json(
            HttpMethod::Post,
            &format!("/alerts/rules/{id}/toggle"),
            &json!({ "enabled": enabled }),
        )
    }

    pub fn parse_toggle_alert_rule(&self, response: HttpResponse) -> Result<StatusReply, ApiError> {
        self.parse_json(response)
    }

    pub fn build_resolve_alert(&self, id: i64) -> HttpRequest {
        self.build_request(
            HttpMethod::Post,
            &format!("/alerts/{id}/resolve"),
            RequestOptions::default(),
        )
    }

    pub fn parse_resolve_alert(&self, response: HttpResponse) -> Result<StatusReply, ApiError> {
        self.parse_json(response)
    }

    // --- services ---

    pub fn build_services(&self) -> HttpRequest {
        self.get("/services")
    }

    pub fn parse_services(&self, response: HttpResponse) -> Result<Vec<ServiceStatus>, ApiError> {
        self.parse_json(response)
    }

    pub fn build_service_action(
        &self,
        action: ServiceAction,
        service_name: &str,
    ) -> Result<HttpRequest, ApiError> {
        self.with_json(
            HttpMethod::Post,
            &format!("/services/{}", action.as_str()),
            &json!({ "service_name": service_name }),
        )
    }

    pub fn parse_service_action(&self, response: HttpResponse) -> Result<ActionReply, ApiError> {
        self.parse_json(response)
    }

    pub fn build_service_logs(&self, service_name: &str, lines: u32) -> HttpRequest {
        self.get(&format!("/services/{service_name}/logs?lines={lines}"))
    }

    pub fn parse_service_logs(&self, response: HttpResponse) -> Result<ServiceLogs, ApiError> {
        self.parse_json(response)
    }
}

/// 401 and 302 both mean the agent no longer honors the session.
fn check_session(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 401 || response.status == 302 {
        warn!(status = response.status, "session invalid");
        return Err(ApiError::Unauthorized);
    }
    Ok(())
}
