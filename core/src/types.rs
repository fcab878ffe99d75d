//! Wire DTOs for the monitor agent API.
//!
//! # Design
//! These types mirror the agent's JSON schema but are defined independently
//! of the mock-server crate; integration tests catch schema drift between
//! the two. Field names follow the wire exactly (snake_case, with `type`
//! renamed to `kind` on the Rust side). Timestamps are RFC 3339 strings on
//! the wire and `chrono::DateTime<Utc>` here.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Point-in-time snapshot of the host, from `GET /api/metrics/host`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HostMetrics {
    pub cpu_percent: f64,
    pub cpu_cores: u32,
    pub busy_cores: u32,
    pub ram_percent: f64,
    pub ram_total: u64,
    pub ram_used: u64,
    pub disk_percent: f64,
    pub disk_total: u64,
    pub disk_used: u64,
    /// Seconds since boot.
    pub uptime: u64,
    pub load_avg: f64,
    pub net_sent: u64,
    pub net_recv: u64,
}

/// One sample from the metrics history tables.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

/// Which history series to query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Cpu,
    Ram,
    Disk,
}

impl MetricKind {
    pub fn as_str(self) -> &'static str {
        match self {
            MetricKind::Cpu => "cpu",
            MetricKind::Ram => "ram",
            MetricKind::Disk => "disk",
        }
    }
}

/// How far back a history query reaches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryRange {
    LastHour,
    LastSixHours,
    LastDay,
}

impl HistoryRange {
    pub fn as_str(self) -> &'static str {
        match self {
            HistoryRange::LastHour => "1h",
            HistoryRange::LastSixHours => "6h",
            HistoryRange::LastDay => "24h",
        }
    }
}

/// One row of `GET /api/processes`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessInfo {
    pub pid: i32,
    pub name: String,
    pub cpu: f64,
    pub memory: f32,
    /// Command line, truncated by the agent for display.
    pub command: String,
    pub status: String,
    pub username: String,
    /// Unix milliseconds.
    pub create_time: i64,
}

/// A fired alert, from `GET /api/alerts/history`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Alert {
    pub id: i64,
    pub rule_id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub resolved: bool,
    pub resolved_at: Option<DateTime<Utc>>,
}

/// A configured alert rule as stored by the agent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AlertRule {
    pub id: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub condition: String,
    pub threshold: f64,
    pub severity: String,
    pub enabled: bool,
    pub email_enabled: bool,
    pub log_pattern: String,
    pub app_filter: String,
    pub log_filter: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub last_triggered: Option<DateTime<Utc>>,
}

/// Caller-settable fields for creating or replacing a rule. The agent
/// assigns `id`, `created_at` and `updated_at` itself.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlertRule {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub condition: String,
    pub threshold: f64,
    pub severity: String,
    pub enabled: bool,
    pub email_enabled: bool,
    pub log_pattern: String,
    pub app_filter: String,
    pub log_filter: String,
}

/// One row of `GET /api/services`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceStatus {
    pub name: String,
    pub service_name: String,
    pub enabled: bool,
    pub description: String,
    pub status: String,
    pub active: bool,
    pub loaded: bool,
    pub uptime: String,
    pub memory_usage: String,
    pub cpu_usage: String,
    pub pid: i32,
    pub config_path: String,
    pub log_path: String,
    pub last_restart: DateTime<Utc>,
    pub version: String,
}

/// Lifecycle operations accepted by `POST /api/services/{action}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Start,
    Stop,
    Restart,
    Enable,
    Disable,
}

impl ServiceAction {
    pub fn as_str(self) -> &'static str {
        match self {
            ServiceAction::Start => "start",
            ServiceAction::Stop => "stop",
            ServiceAction::Restart => "restart",
            ServiceAction::Enable => "enable",
            ServiceAction::Disable => "disable",
        }
    }
}

/// A monitored application from the agent's configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    pub name: String,
    pub service_name: String,
    pub logs: Vec<LogTarget>,
}

/// A named log location inside an `AppConfig`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogTarget {
    pub name: String,
    pub path: String,
}

/// One discovered file for a configured log, from `GET /api/logs/files`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub mod_time: DateTime<Utc>,
    pub is_archive: bool,
}

/// One matched line from `GET /api/logs/search`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LogResult {
    pub app: String,
    pub file: String,
    pub level: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Parameters for a log search. `app` and `log` are required by the agent;
/// the rest narrow the search.
#[derive(Debug, Clone, Default)]
pub struct LogQuery {
    pub query: Option<String>,
    pub app: String,
    pub log: String,
    pub file: Option<String>,
    pub level: Option<String>,
    pub limit: Option<u32>,
}

/// `{"status": ...}` acknowledgement returned by mutating endpoints.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusReply {
    pub status: String,
}

/// `{"status", "action"}` envelope returned by service actions.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActionReply {
    pub status: String,
    pub action: String,
}

/// `{"logs": [...]}` envelope returned by `GET /api/services/{name}/logs`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ServiceLogs {
    pub logs: Vec<String>,
}
