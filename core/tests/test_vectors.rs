//! Verify build/parse methods against JSON test vectors stored in `test-vectors/`.
//!
//! Each vector file describes inputs, expected requests, simulated responses,
//! and expected parse results. Comparing typed values (not raw strings)
//! avoids false negatives from field-ordering differences.

use monitor_core::{
    Alert, AlertRule, ApiError, AppConfig, HistoryRange, HostMetrics, HttpMethod, HttpRequest,
    HttpResponse, LogFile, LogQuery, LogResult, MetricKind, MetricPoint, MonitorClient,
    NewAlertRule, ProcessInfo, ServiceAction, ServiceLogs, ServiceStatus, StatusReply,
};
use serde_json::Value;

const BASE_URL: &str = "http://localhost:3000";
const TOKEN: &str = "secret-key";

fn client() -> MonitorClient {
    MonitorClient::new(BASE_URL, TOKEN)
}

fn load(raw: &str) -> Vec<Value> {
    let vectors: Value = serde_json::from_str(raw).unwrap();
    vectors["cases"].as_array().unwrap().clone()
}

fn method_name(method: HttpMethod) -> &'static str {
    match method {
        HttpMethod::Get => "GET",
        HttpMethod::Post => "POST",
        HttpMethod::Put => "PUT",
        HttpMethod::Delete => "DELETE",
    }
}

/// Check method, path, default headers and (JSON-compared) body.
fn check_request(name: &str, case: &Value, req: &HttpRequest) {
    let expected = &case["expected_request"];
    assert_eq!(
        method_name(req.method),
        expected["method"].as_str().unwrap(),
        "{name}: method"
    );
    assert_eq!(
        req.path,
        format!("{BASE_URL}{}", expected["path"].as_str().unwrap()),
        "{name}: path"
    );
    assert_eq!(req.header("X-Auth-Token"), Some(TOKEN), "{name}: auth header");
    assert_eq!(
        req.header("Content-Type"),
        Some("application/json"),
        "{name}: content type"
    );
    let expected_body = &expected["body"];
    if expected_body.is_null() {
        assert!(req.body.is_none(), "{name}: body should be None");
    } else {
        let actual: Value =
            serde_json::from_str(req.body.as_deref().expect("body")).unwrap();
        assert_eq!(&actual, expected_body, "{name}: body");
    }
}

fn response_from(case: &Value) -> HttpResponse {
    let sim = &case["simulated_response"];
    HttpResponse {
        status: sim["status"].as_u64().unwrap() as u16,
        status_text: sim["status_text"].as_str().unwrap().to_string(),
        headers: Vec::new(),
        body: sim["body"].as_str().unwrap().to_string(),
    }
}

/// Assert the parse outcome matches `expected_result`/`expected_error`.
fn check_outcome<T>(name: &str, case: &Value, result: Result<T, ApiError>)
where
    T: serde::de::DeserializeOwned + PartialEq + std::fmt::Debug,
{
    match case.get("expected_error").and_then(Value::as_str) {
        Some("Unauthorized") => {
            let err = result.unwrap_err();
            assert!(matches!(err, ApiError::Unauthorized), "{name}: expected Unauthorized");
        }
        Some("Api") => {
            let err = result.unwrap_err();
            assert!(matches!(err, ApiError::Api { .. }), "{name}: expected Api error");
        }
        Some(other) => panic!("{name}: unknown expected_error: {other}"),
        None => {
            let expected: T = serde_json::from_value(case["expected_result"].clone()).unwrap();
            assert_eq!(result.unwrap(), expected, "{name}: parsed result");
        }
    }
}

fn metric_kind(s: &str) -> MetricKind {
    match s {
        "cpu" => MetricKind::Cpu,
        "ram" => MetricKind::Ram,
        "disk" => MetricKind::Disk,
        other => panic!("unknown metric kind: {other}"),
    }
}

fn history_range(s: &str) -> HistoryRange {
    match s {
        "1h" => HistoryRange::LastHour,
        "6h" => HistoryRange::LastSixHours,
        "24h" => HistoryRange::LastDay,
        other => panic!("unknown range: {other}"),
    }
}

fn service_action(s: &str) -> ServiceAction {
    match s {
        "start" => ServiceAction::Start,
        "stop" => ServiceAction::Stop,
        "restart" => ServiceAction::Restart,
        "enable" => ServiceAction::Enable,
        "disable" => ServiceAction::Disable,
        other => panic!("unknown action: {other}"),
    }
}

#[test]
fn metrics_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/metrics.json")) {
        let name = case["name"].as_str().unwrap();
        match case["operation"].as_str().unwrap() {
            "host_metrics" => {
                let req = c.build_host_metrics();
                check_request(name, &case, &req);
                check_outcome::<HostMetrics>(name, &case, c.parse_host_metrics(response_from(&case)));
            }
            "metrics_history" => {
                let kind = metric_kind(case["kind"].as_str().unwrap());
                let range = history_range(case["range"].as_str().unwrap());
                let req = c.build_metrics_history(kind, range);
                check_request(name, &case, &req);
                check_outcome::<Vec<MetricPoint>>(
                    name,
                    &case,
                    c.parse_metrics_history(response_from(&case)),
                );
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

#[test]
fn processes_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/processes.json")) {
        let name = case["name"].as_str().unwrap();
        match case["operation"].as_str().unwrap() {
            "processes" => {
                let req = c.build_processes();
                check_request(name, &case, &req);
                check_outcome::<Vec<ProcessInfo>>(name, &case, c.parse_processes(response_from(&case)));
            }
            "kill_process" => {
                let pid = case["pid"].as_i64().unwrap() as i32;
                let req = c.build_kill_process(pid).unwrap();
                check_request(name, &case, &req);
                check_outcome::<StatusReply>(name, &case, c.parse_kill_process(response_from(&case)));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

#[test]
fn alerts_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/alerts.json")) {
        let name = case["name"].as_str().unwrap();
        match case["operation"].as_str().unwrap() {
            "alert_history" => {
                let req = c.build_alert_history();
                check_request(name, &case, &req);
                check_outcome::<Vec<Alert>>(name, &case, c.parse_alert_history(response_from(&case)));
            }
            "create_alert_rule" => {
                let input: NewAlertRule = serde_json::from_value(case["input"].clone()).unwrap();
                let req = c.build_create_alert_rule(&input).unwrap();
                check_request(name, &case, &req);
                check_outcome::<AlertRule>(
                    name,
                    &case,
                    c.parse_create_alert_rule(response_from(&case)),
                );
            }
            "toggle_alert_rule" => {
                let id = case["rule_id"].as_str().unwrap();
                let enabled = case["enabled"].as_bool().unwrap();
                let req = c.build_toggle_alert_rule(id, enabled).unwrap();
                check_request(name, &case, &req);
                check_outcome::<StatusReply>(
                    name,
                    &case,
                    c.parse_toggle_alert_rule(response_from(&case)),
                );
            }
            "delete_alert_rule" => {
                let id = case["rule_id"].as_str().unwrap();
                let req = c.build_delete_alert_rule(id);
                check_request(name, &case, &req);
                check_outcome::<StatusReply>(
                    name,
                    &case,
                    c.parse_delete_alert_rule(response_from(&case)),
                );
            }
            "resolve_alert" => {
                let id = case["alert_id"].as_i64().unwrap();
                let req = c.build_resolve_alert(id);
                check_request(name, &case, &req);
                check_outcome::<StatusReply>(name, &case, c.parse_resolve_alert(response_from(&case)));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

#[test]
fn services_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/services.json")) {
        let name = case["name"].as_str().unwrap();
        match case["operation"].as_str().unwrap() {
            "services" => {
                let req = c.build_services();
                check_request(name, &case, &req);
                check_outcome::<Vec<ServiceStatus>>(name, &case, c.parse_services(response_from(&case)));
            }
            "service_action" => {
                let action = service_action(case["action"].as_str().unwrap());
                let service = case["service_name"].as_str().unwrap();
                let req = c.build_service_action(action, service).unwrap();
                check_request(name, &case, &req);
                check_outcome::<monitor_core::ActionReply>(
                    name,
                    &case,
                    c.parse_service_action(response_from(&case)),
                );
            }
            "service_logs" => {
                let service = case["service_name"].as_str().unwrap();
                let lines = case["lines"].as_u64().unwrap() as u32;
                let req = c.build_service_logs(service, lines);
                check_request(name, &case, &req);
                check_outcome::<ServiceLogs>(name, &case, c.parse_service_logs(response_from(&case)));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}

#[test]
fn logs_test_vectors() {
    let c = client();
    for case in load(include_str!("../../test-vectors/logs.json")) {
        let name = case["name"].as_str().unwrap();
        match case["operation"].as_str().unwrap() {
            "apps" => {
                let req = c.build_apps();
                check_request(name, &case, &req);
                check_outcome::<Vec<AppConfig>>(name, &case, c.parse_apps(response_from(&case)));
            }
            "log_files" => {
                let app = case["app"].as_str().unwrap();
                let log = case["log"].as_str().unwrap();
                let req = c.build_log_files(app, log);
                check_request(name, &case, &req);
                check_outcome::<Vec<LogFile>>(name, &case, c.parse_log_files(response_from(&case)));
            }
            "search_logs" => {
                let query = LogQuery {
                    query: case.get("query").and_then(Value::as_str).map(String::from),
                    app: case["app"].as_str().unwrap().to_string(),
                    log: case["log"].as_str().unwrap().to_string(),
                    file: case.get("file").and_then(Value::as_str).map(String::from),
                    level: case.get("level").and_then(Value::as_str).map(String::from),
                    limit: case.get("limit").and_then(Value::as_u64).map(|l| l as u32),
                };
                let req = c.build_search_logs(&query);
                check_request(name, &case, &req);
                check_outcome::<Vec<LogResult>>(name, &case, c.parse_search_logs(response_from(&case)));
            }
            other => panic!("{name}: unknown operation: {other}"),
        }
    }
}
