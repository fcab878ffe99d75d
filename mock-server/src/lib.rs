use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Query, Request, State},
    http::{header::LOCATION, HeaderMap, StatusCode},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

// Wire DTOs. Defined here independently of monitor-core so schema drift
// between the two crates is caught by the integration tests.

#[derive(Clone, Debug, Serialize, Deserialize)]
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
    pub uptime: u64,
    pub load_avg: f64,
    pub net_sent: u64,
    pub net_recv: u64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MetricPoint {
    pub timestamp: DateTime<Utc>,
    pub value: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProcessInfo {
    pub pid: i32,
    pub name: String,
    pub cpu: f64,
    pub memory: f32,
    pub command: String,
    pub status: String,
    pub username: String,
    pub create_time: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
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

/// Caller-settable rule fields; the server assigns the rest.
#[derive(Clone, Debug, Deserialize)]
pub struct RuleBody {
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

#[derive(Clone, Debug, Serialize, Deserialize)]
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

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AppConfig {
    pub name: String,
    pub service_name: String,
    pub logs: Vec<LogTarget>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogTarget {
    pub name: String,
    pub path: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogFile {
    pub name: String,
    pub path: String,
    pub size: u64,
    pub mod_time: DateTime<Utc>,
    pub is_archive: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LogResult {
    pub app: String,
    pub file: String,
    pub level: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Everything the mock serves, mutable behind one lock.
pub struct MockData {
    pub metrics: HostMetrics,
    pub history: HashMap<String, Vec<MetricPoint>>,
    pub processes: Vec<ProcessInfo>,
    pub alerts: Vec<Alert>,
    pub next_alert_id: i64,
    pub rules: HashMap<String, AlertRule>,
    pub services: Vec<ServiceStatus>,
    pub apps: Vec<AppConfig>,
    pub log_files: Vec<LogFile>,
    pub log_results: Vec<LogResult>,
    pub service_logs: HashMap<String, Vec<String>>,
}

impl MockData {
    /// A small, self-consistent snapshot of a host.
    pub fn sample() -> Self {
        let now = Utc::now();
        let gib = 1u64 << 30;

        let history = |base: f64| {
            (0..6)
                .map(|i| MetricPoint {
                    timestamp: now - Duration::minutes(10 * (6 - i)),
                    value: base + i as f64,
                })
                .collect::<Vec<_>>()
        };

        let mut rules = HashMap::new();
        rules.insert(
            "rule_cpu_high".to_string(),
            AlertRule {
                id: "rule_cpu_high".to_string(),
                name: "High CPU".to_string(),
                description: "CPU usage above threshold".to_string(),
                kind: "cpu".to_string(),
                condition: "above".to_string(),
                threshold: 90.0,
                severity: "critical".to_string(),
                enabled: true,
                email_enabled: false,
                log_pattern: String::new(),
                app_filter: String::new(),
                log_filter: String::new(),
                created_at: now - Duration::days(7),
                updated_at: now - Duration::days(7),
                last_triggered: Some(now - Duration::hours(3)),
            },
        );

        let mut service_logs = HashMap::new();
        service_logs.insert(
            "nginx".to_string(),
            (1..=80)
                .map(|i| format!("192.168.1.10 - - \"GET /status HTTP/1.1\" 200 {i}"))
                .collect(),
        );
        service_logs.insert(
            "monitor-agent".to_string(),
            vec!["agent started".to_string(), "history recorder running".to_string()],
        );

        Self {
            metrics: HostMetrics {
                cpu_percent: 12.5,
                cpu_cores: 8,
                busy_cores: 2,
                ram_percent: 41.3,
                ram_total: 16 * gib,
                ram_used: 16 * gib * 413 / 1000,
                disk_percent: 63.0,
                disk_total: 512 * gib,
                disk_used: 512 * gib * 63 / 100,
                uptime: 259_200,
                load_avg: 0.42,
                net_sent: 7_340_032,
                net_recv: 52_428_800,
            },
            history: HashMap::from([
                ("cpu".to_string(), history(10.0)),
                ("ram".to_string(), history(40.0)),
                ("disk".to_string(), history(62.0)),
            ]),
            processes: vec![
                ProcessInfo {
                    pid: 1,
                    name: "systemd".to_string(),
                    cpu: 0.1,
                    memory: 0.2,
                    command: "/sbin/init".to_string(),
                    status: "sleeping".to_string(),
                    username: "root".to_string(),
                    create_time: (now - Duration::days(3)).timestamp_millis(),
                },
                ProcessInfo {
                    pid: 812,
                    name: "nginx".to_string(),
                    cpu: 1.8,
                    memory: 1.1,
                    command: "nginx: master process /usr/sbin/nginx".to_string(),
                    status: "running".to_string(),
                    username: "www-data".to_string(),
                    create_time: (now - Duration::days(2)).timestamp_millis(),
                },
                ProcessInfo {
                    pid: 4301,
                    name: "runaway".to_string(),
                    cpu: 97.0,
                    memory: 22.5,
                    command: "/opt/app/bin/worker --queue default".to_string(),
                    status: "running".to_string(),
                    username: "app".to_string(),
                    create_time: (now - Duration::hours(4)).timestamp_millis(),
                },
            ],
            alerts: vec![
                Alert {
                    id: 1,
                    rule_id: "rule_cpu_high".to_string(),
                    kind: "cpu".to_string(),
                    severity: "critical".to_string(),
                    message: "CPU usage at 97%".to_string(),
                    timestamp: now - Duration::hours(3),
                    resolved: false,
                    resolved_at: None,
                },
                Alert {
                    id: 2,
                    rule_id: "rule_cpu_high".to_string(),
                    kind: "cpu".to_string(),
                    severity: "critical".to_string(),
                    message: "CPU usage at 95%".to_string(),
                    timestamp: now - Duration::days(1),
                    resolved: true,
                    resolved_at: Some(now - Duration::hours(20)),
                },
            ],
            next_alert_id: 3,
            rules,
            services: vec![
                ServiceStatus {
                    name: "Web Server".to_string(),
                    service_name: "nginx".to_string(),
                    enabled: true,
                    description: "Reverse proxy".to_string(),
                    status: "running".to_string(),
                    active: true,
                    loaded: true,
                    uptime: "2d 4h".to_string(),
                    memory_usage: "24.1 MB".to_string(),
                    cpu_usage: "1.8%".to_string(),
                    pid: 812,
                    config_path: "/etc/nginx/nginx.conf".to_string(),
                    log_path: "/var/log/nginx".to_string(),
                    last_restart: now - Duration::days(2),
                    version: "1.24.0".to_string(),
                },
                ServiceStatus {
                    name: "Monitor Agent".to_string(),
                    service_name: "monitor-agent".to_string(),
                    enabled: true,
                    description: "Host monitoring agent".to_string(),
                    status: "running".to_string(),
                    active: true,
                    loaded: true,
                    uptime: "3d 0h".to_string(),
                    memory_usage: "12.6 MB".to_string(),
                    cpu_usage: "0.3%".to_string(),
                    pid: 977,
                    config_path: "/etc/monitor/config.yaml".to_string(),
                    log_path: "/var/log/monitor".to_string(),
                    last_restart: now - Duration::days(3),
                    version: "0.1.0".to_string(),
                },
            ],
            apps: vec![
                AppConfig {
                    name: "web".to_string(),
                    service_name: "nginx".to_string(),
                    logs: vec![
                        LogTarget {
                            name: "access".to_string(),
                            path: "/var/log/nginx/access.log".to_string(),
                        },
                        LogTarget {
                            name: "error".to_string(),
                            path: "/var/log/nginx/error.log".to_string(),
                        },
                    ],
                },
                AppConfig {
                    name: "agent".to_string(),
                    service_name: "monitor-agent".to_string(),
                    logs: vec![LogTarget {
                        name: "main".to_string(),
                        path: "/var/log/monitor/agent.log".to_string(),
                    }],
                },
            ],
            log_files: vec![
                LogFile {
                    name: "access.log".to_string(),
                    path: "/var/log/nginx/access.log".to_string(),
                    size: 1_572_864,
                    mod_time: now - Duration::minutes(1),
                    is_archive: false,
                },
                LogFile {
                    name: "access.log.1.gz".to_string(),
                    path: "/var/log/nginx/access.log.1.gz".to_string(),
                    size: 262_144,
                    mod_time: now - Duration::days(1),
                    is_archive: true,
                },
            ],
            log_results: vec![
                LogResult {
                    app: "web".to_string(),
                    file: "error.log".to_string(),
                    level: "ERROR".to_string(),
                    message: "upstream timed out while connecting".to_string(),
                    timestamp: now - Duration::minutes(12),
                },
                LogResult {
                    app: "web".to_string(),
                    file: "error.log".to_string(),
                    level: "WARN".to_string(),
                    message: "worker connections are not enough".to_string(),
                    timestamp: now - Duration::minutes(9),
                },
                LogResult {
                    app: "agent".to_string(),
                    file: "agent.log".to_string(),
                    level: "INFO".to_string(),
                    message: "history recorder tick".to_string(),
                    timestamp: now - Duration::minutes(5),
                },
            ],
            service_logs,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    token: String,
    data: Arc<RwLock<MockData>>,
}

impl AppState {
    pub fn new(token: &str) -> Self {
        Self {
            token: token.to_string(),
            data: Arc::new(RwLock::new(MockData::sample())),
        }
    }
}

/// Build the mock agent app. Every `/api` route requires `X-Auth-Token`
/// to match `token`.
pub fn app(token: &str) -> Router {
    let state = AppState::new(token);
    Router::new()
        .route("/api/apps", get(list_apps))
        .route("/api/metrics/host", get(host_metrics))
        .route("/api/metrics/history", get(metrics_history))
        .route("/api/metrics/disk-history", get(disk_history))
        .route("/api/processes", get(list_processes))
        .route("/api/processes/kill", post(kill_process))
        .route("/api/logs/files", get(log_files))
        .route("/api/logs/search", get(search_logs))
        .route("/api/alerts/history", get(alert_history))
        .route("/api/alerts/test", post(test_alert))
        .route("/api/alerts/rules", get(list_rules).post(create_rule))
        .route("/api/alerts/rules/{id}", put(update_rule).delete(delete_rule))
        .route("/api/alerts/rules/{id}/toggle", post(toggle_rule))
        .route("/api/alerts/{id}/resolve", post(resolve_alert))
        .route("/api/services", get(list_services))
        .route("/api/services/{action}", post(service_action))
        .route("/api/services/{service}/logs", get(service_logs))
        .layer(middleware::from_fn_with_state(state.clone(), require_token))
        .with_state(state)
}

pub async fn run(listener: TcpListener, token: &str) -> Result<(), std::io::Error> {
    axum::serve(listener, app(token)).await
}

async fn require_token(
    State(state): State<AppState>,
    headers: HeaderMap,
    request: Request,
    next: Next,
) -> Response {
    let presented = headers
        .get("X-Auth-Token")
        .and_then(|value| value.to_str().ok());
    if presented != Some(state.token.as_str()) {
        return error_reply(StatusCode::UNAUTHORIZED, "Unauthorized");
    }
    next.run(request).await
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn list_apps(State(state): State<AppState>) -> Json<Vec<AppConfig>> {
    Json(state.data.read().await.apps.clone())
}

async fn host_metrics(State(state): State<AppState>) -> Json<HostMetrics> {
    Json(state.data.read().await.metrics.clone())
}

#[derive(Deserialize)]
struct HistoryParams {
    #[serde(rename = "type")]
    kind: Option<String>,
}

async fn metrics_history(
    State(state): State<AppState>,
    Query(params): Query<HistoryParams>,
) -> Json<Vec<MetricPoint>> {
    let data = state.data.read().await;
    // Unknown series fall back to disk.
    let kind = params.kind.as_deref().unwrap_or("disk");
    let points = data
        .history
        .get(kind)
        .or_else(|| data.history.get("disk"))
        .cloned()
        .unwrap_or_default();
    Json(points)
}

/// Convenience path kept for dashboard compatibility; answers with a
/// redirect instead of data.
async fn disk_history(State(_state): State<AppState>) -> Response {
    (
        StatusCode::FOUND,
        [(LOCATION, "/api/metrics/history?type=disk")],
    )
        .into_response()
}

async fn list_processes(State(state): State<AppState>) -> Json<Vec<ProcessInfo>> {
    Json(state.data.read().await.processes.clone())
}

#[derive(Deserialize)]
struct KillReq {
    pid: i32,
}

async fn kill_process(
    State(state): State<AppState>,
    Json(req): Json<KillReq>,
) -> Response {
    let mut data = state.data.write().await;
    let before = data.processes.len();
    data.processes.retain(|p| p.pid != req.pid);
    if data.processes.len() == before {
        return error_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            "process does not exist",
        );
    }
    Json(json!({ "status": "Process killed successfully" })).into_response()
}

#[derive(Deserialize)]
struct LogFilesParams {
    app: Option<String>,
    log: Option<String>,
}

async fn log_files(
    State(state): State<AppState>,
    Query(params): Query<LogFilesParams>,
) -> Response {
    let (Some(app), Some(log)) = (params.app, params.log) else {
        return error_reply(StatusCode::BAD_REQUEST, "app and log params required");
    };
    let data = state.data.read().await;
    let Some(file) = target_file(&data.apps, &app, &log) else {
        return Json(Vec::<LogFile>::new()).into_response();
    };
    let files: Vec<LogFile> = data
        .log_files
        .iter()
        .filter(|f| f.name.starts_with(&file))
        .cloned()
        .collect();
    Json(files).into_response()
}

#[derive(Deserialize)]
struct SearchParams {
    q: Option<String>,
    app: Option<String>,
    log: Option<String>,
    file: Option<String>,
    level: Option<String>,
    limit: Option<usize>,
}

/// File name a configured log target resolves to, e.g. `error` → `error.log`.
fn target_file(apps: &[AppConfig], app: &str, log: &str) -> Option<String> {
    apps.iter()
        .find(|a| a.name == app)?
        .logs
        .iter()
        .find(|l| l.name == log)
        .map(|l| l.path.rsplit('/').next().unwrap_or(&l.path).to_string())
}

async fn search_logs(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Response {
    let (Some(app), Some(log)) = (params.app, params.log) else {
        return error_reply(StatusCode::BAD_REQUEST, "app and log parameters required");
    };
    let data = state.data.read().await;
    let Some(file) = target_file(&data.apps, &app, &log) else {
        return Json(Vec::<LogResult>::new()).into_response();
    };
    let limit = params.limit.unwrap_or(500);
    let results: Vec<LogResult> = data
        .log_results
        .iter()
        .filter(|r| r.app == app && r.file == file)
        .filter(|r| {
            params
                .file
                .as_deref()
                .map_or(true, |wanted| r.file == wanted)
        })
        .filter(|r| {
            params
                .level
                .as_deref()
                .map_or(true, |level| r.level.eq_ignore_ascii_case(level))
        })
        .filter(|r| params.q.as_deref().map_or(true, |q| r.message.contains(q)))
        .take(limit)
        .cloned()
        .collect();
    Json(results).into_response()
}

async fn alert_history(State(state): State<AppState>) -> Json<Vec<Alert>> {
    Json(state.data.read().await.alerts.clone())
}

async fn test_alert(State(state): State<AppState>) -> Json<serde_json::Value> {
    let mut data = state.data.write().await;
    let id = data.next_alert_id;
    data.next_alert_id += 1;
    data.alerts.push(Alert {
        id,
        rule_id: "test".to_string(),
        kind: "test".to_string(),
        severity: "info".to_string(),
        message: "This is a test alert triggered by user".to_string(),
        timestamp: Utc::now(),
        resolved: false,
        resolved_at: None,
    });
    Json(json!({ "status": "ok" }))
}

async fn list_rules(State(state): State<AppState>) -> Json<Vec<AlertRule>> {
    let data = state.data.read().await;
    let mut rules: Vec<AlertRule> = data.rules.values().cloned().collect();
    rules.sort_by(|a, b| a.created_at.cmp(&b.created_at));
    Json(rules)
}

fn rule_from_body(id: String, created_at: DateTime<Utc>, body: RuleBody) -> AlertRule {
    AlertRule {
        id,
        name: body.name,
        description: body.description,
        kind: body.kind,
        condition: body.condition,
        threshold: body.threshold,
        severity: body.severity,
        enabled: body.enabled,
        email_enabled: body.email_enabled,
        log_pattern: body.log_pattern,
        app_filter: body.app_filter,
        log_filter: body.log_filter,
        created_at,
        updated_at: Utc::now(),
        last_triggered: None,
    }
}

async fn create_rule(
    State(state): State<AppState>,
    Json(body): Json<RuleBody>,
) -> Json<AlertRule> {
    let id = format!("rule_{}", Uuid::new_v4().simple());
    let rule = rule_from_body(id.clone(), Utc::now(), body);
    state.data.write().await.rules.insert(id, rule.clone());
    Json(rule)
}

async fn update_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<RuleBody>,
) -> Response {
    let mut data = state.data.write().await;
    let Some(existing) = data.rules.get(&id) else {
        return error_reply(StatusCode::NOT_FOUND, "Rule not found");
    };
    let rule = rule_from_body(id.clone(), existing.created_at, body);
    data.rules.insert(id, rule.clone());
    Json(rule).into_response()
}

async fn delete_rule(State(state): State<AppState>, Path(id): Path<String>) -> Json<serde_json::Value> {
    state.data.write().await.rules.remove(&id);
    Json(json!({ "status": "deleted" }))
}

#[derive(Deserialize)]
struct ToggleReq {
    enabled: bool,
}

async fn toggle_rule(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ToggleReq>,
) -> Response {
    let mut data = state.data.write().await;
    let Some(rule) = data.rules.get_mut(&id) else {
        return error_reply(StatusCode::NOT_FOUND, "Rule not found");
    };
    rule.enabled = req.enabled;
    rule.updated_at = Utc::now();
    Json(json!({ "status": "updated" })).into_response()
}

async fn resolve_alert(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    let mut data = state.data.write().await;
    let Some(alert) = data.alerts.iter_mut().find(|a| a.id == id) else {
        return error_reply(StatusCode::INTERNAL_SERVER_ERROR, "alert does not exist");
    };
    alert.resolved = true;
    alert.resolved_at = Some(Utc::now());
    Json(json!({ "status": "resolved" })).into_response()
}

async fn list_services(State(state): State<AppState>) -> Json<Vec<ServiceStatus>> {
    Json(state.data.read().await.services.clone())
}

#[derive(Deserialize)]
struct ServiceReq {
    service_name: String,
}

async fn service_action(
    State(state): State<AppState>,
    Path(action): Path<String>,
    Json(req): Json<ServiceReq>,
) -> Response {
    if !matches!(
        action.as_str(),
        "start" | "stop" | "restart" | "enable" | "disable"
    ) {
        return error_reply(StatusCode::BAD_REQUEST, "Invalid action");
    }
    let mut data = state.data.write().await;
    let Some(service) = data
        .services
        .iter_mut()
        .find(|s| s.service_name == req.service_name)
    else {
        return error_reply(StatusCode::INTERNAL_SERVER_ERROR, "unknown service");
    };
    match action.as_str() {
        "start" | "restart" => {
            service.active = true;
            service.status = "running".to_string();
            service.last_restart = Utc::now();
        }
        "stop" => {
            service.active = false;
            service.status = "stopped".to_string();
        }
        "enable" => service.enabled = true,
        "disable" => service.enabled = false,
        _ => unreachable!(),
    }
    Json(json!({ "status": "success", "action": action })).into_response()
}

#[derive(Deserialize)]
struct ServiceLogsParams {
    lines: Option<usize>,
}

async fn service_logs(
    State(state): State<AppState>,
    Path(service): Path<String>,
    Query(params): Query<ServiceLogsParams>,
) -> Response {
    let data = state.data.read().await;
    let Some(lines) = data.service_logs.get(&service) else {
        return error_reply(StatusCode::INTERNAL_SERVER_ERROR, "unknown service");
    };
    let count = params.lines.unwrap_or(50);
    let tail: Vec<String> = lines
        .iter()
        .skip(lines.len().saturating_sub(count))
        .cloned()
        .collect();
    Json(json!({ "logs": tail })).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_serializes_wire_type_field() {
        let alert = Alert {
            id: 5,
            rule_id: "rule_cpu_high".to_string(),
            kind: "cpu".to_string(),
            severity: "critical".to_string(),
            message: "CPU usage at 97%".to_string(),
            timestamp: Utc::now(),
            resolved: false,
            resolved_at: None,
        };
        let json = serde_json::to_value(&alert).unwrap();
        assert_eq!(json["type"], "cpu");
        assert!(json.get("kind").is_none());
        assert_eq!(json["resolved_at"], serde_json::Value::Null);
    }

    #[test]
    fn rule_body_rejects_missing_fields() {
        let result: Result<RuleBody, _> = serde_json::from_str(r#"{"name":"x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn sample_data_is_self_consistent() {
        let data = MockData::sample();
        for app in &data.apps {
            assert!(!app.logs.is_empty());
        }
        for service in &data.services {
            assert!(
                data.service_logs.contains_key(&service.service_name),
                "every sample service has logs"
            );
        }
        assert!(data.rules.contains_key("rule_cpu_high"));
    }
}
