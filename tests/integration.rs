//! Integration tests for the MotorPH payroll HTTP API.
//!
//! Each test builds a router over a fresh data directory and drives it
//! through `tower::ServiceExt::oneshot`. The suite covers:
//! - Employee management
//! - Attendance recording
//! - Payslip computation (JSON and text)
//! - Accounts and login
//! - Error cases

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use std::str::FromStr;
use tempfile::TempDir;
use tower::ServiceExt;

use motorph_payroll::api::{create_router, AppState};
use motorph_payroll::config::{ConfigLoader, PayrollConfig};
use motorph_payroll::service::PayrollService;

// =============================================================================
// Test Helpers
// =============================================================================

/// Returns the router and the directory backing it; the directory must
/// outlive the router.
fn create_router_for_test() -> (TempDir, Router) {
    let dir = TempDir::new().unwrap();
    let service = PayrollService::open(dir.path(), PayrollConfig::default());
    (dir, create_router(AppState::new(service)))
}

/// Normalize decimal string by removing trailing zeros after decimal point
fn normalize_decimal(s: &str) -> String {
    Decimal::from_str(s).unwrap().normalize().to_string()
}

fn assert_amount(result: &Value, field: &str, expected: &str) {
    let actual = result[field]
        .as_str()
        .unwrap_or_else(|| panic!("field '{}' missing in {}", field, result));
    assert_eq!(
        normalize_decimal(actual),
        normalize_decimal(expected),
        "Expected {} {}, got {}",
        field,
        expected,
        actual
    );
}

async fn send(router: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body_bytes.to_vec())
}

async fn send_json(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, bytes) = send(router, method, uri, body).await;
    if bytes.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn create_employee_body(id: u32, first_name: &str, hourly_rate: &str, monthly_salary: &str) -> Value {
    json!({
        "id": id,
        "first_name": first_name,
        "last_name": "Garcia",
        "birthday": "10/11/1983",
        "position": "Payroll Clerk",
        "hourly_rate": hourly_rate,
        "monthly_salary": monthly_salary,
        "government_ids": {
            "sss": "44-4506057-3",
            "philhealth": "820126853951",
            "tin": "442-605-657-000",
            "pagibig": "691295330870"
        }
    })
}

fn create_attendance_body(employee_id: u32, date: &str, time_in: &str, time_out: &str) -> Value {
    json!({
        "employee_id": employee_id,
        "date": date,
        "time_in": time_in,
        "time_out": time_out
    })
}

/// Creates employee 10001 at 100/hour and one late day on 2024-06-03.
async fn seed_late_day(router: &Router) {
    let (status, _) = send_json(
        router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, "Manuel", "100", "3000")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = send_json(
        router,
        "POST",
        "/attendance",
        Some(create_attendance_body(10001, "2024-06-03", "9:00 AM", "6:00 PM")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

// =============================================================================
// SECTION 1: Employee Management Tests
// =============================================================================

#[tokio::test]
async fn test_create_and_get_employee() {
    let (_dir, router) = create_router_for_test();

    let (status, created) = send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, " Manuel ", "535.71", "90000")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["first_name"], "Manuel");

    let (status, fetched) = send_json(&router, "GET", "/employees/10001", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["id"], 10001);
    assert_amount(&fetched, "hourly_rate", "535.71");
    assert_eq!(fetched["government_ids"]["tin"], "442-605-657-000");
}

#[tokio::test]
async fn test_list_employees() {
    let (_dir, router) = create_router_for_test();
    for (id, name) in [(10002, "Antonio"), (10001, "Manuel")] {
        send_json(
            &router,
            "POST",
            "/employees",
            Some(create_employee_body(id, name, "100", "20000")),
        )
        .await;
    }

    let (status, list) = send_json(&router, "GET", "/employees", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_duplicate_employee_is_conflict() {
    let (_dir, router) = create_router_for_test();
    let body = create_employee_body(10001, "Manuel", "100", "20000");

    send_json(&router, "POST", "/employees", Some(body.clone())).await;
    let (status, error) = send_json(&router, "POST", "/employees", Some(body)).await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn test_employee_with_zero_id_is_rejected() {
    let (_dir, router) = create_router_for_test();

    let (status, error) = send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(0, "Manuel", "100", "20000")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_patch_employee_keeps_blank_fields() {
    let (_dir, router) = create_router_for_test();
    send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, "Manuel", "100", "20000")),
    )
    .await;

    let (status, edited) = send_json(
        &router,
        "PATCH",
        "/employees/10001",
        Some(json!({ "first_name": "  ", "position": "Team Lead", "hourly_rate": "-1" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["first_name"], "Manuel");
    assert_eq!(edited["position"], "Team Lead");
    assert_amount(&edited, "hourly_rate", "100");
}

#[tokio::test]
async fn test_patch_unknown_employee_is_not_found() {
    let (_dir, router) = create_router_for_test();

    let (status, error) = send_json(
        &router,
        "PATCH",
        "/employees/99999",
        Some(json!({ "position": "Team Lead" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_employee_profile_is_plain_text() {
    let (_dir, router) = create_router_for_test();
    send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, "Manuel", "100", "20000")),
    )
    .await;

    let (status, bytes) = send(&router, "GET", "/employees/10001/profile", None).await;
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.contains("Manuel"));
    assert!(text.contains("44-4506057-3"));
}

#[tokio::test]
async fn test_delete_employee_cascades() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;
    send_json(&router, "POST", "/users/sync", None).await;

    let (status, _) = send_json(&router, "DELETE", "/employees/10001", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send_json(&router, "GET", "/employees/10001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, users) = send_json(&router, "GET", "/users", None).await;
    assert!(users.as_array().unwrap().is_empty());

    let (status, _) = send_json(&router, "DELETE", "/employees/10001", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// SECTION 2: Attendance Tests
// =============================================================================

#[tokio::test]
async fn test_record_attendance_copies_names() {
    let (_dir, router) = create_router_for_test();
    send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, "Manuel", "100", "20000")),
    )
    .await;

    let (status, record) = send_json(
        &router,
        "POST",
        "/attendance",
        Some(create_attendance_body(10001, "2024-06-03", "08:05", "17:00")),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["first_name"], "Manuel");
    assert_eq!(record["last_name"], "Garcia");
    assert_eq!(record["time_in"], "08:05:00");
}

#[tokio::test]
async fn test_duplicate_attendance_is_conflict() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (status, error) = send_json(
        &router,
        "POST",
        "/attendance",
        Some(create_attendance_body(10001, "2024-06-03", "8:00 AM", "5:00 PM")),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_KEY");
}

#[tokio::test]
async fn test_attendance_for_unknown_employee_is_not_found() {
    let (_dir, router) = create_router_for_test();

    let (status, _) = send_json(
        &router,
        "POST",
        "/attendance",
        Some(create_attendance_body(99999, "2024-06-03", "8:00 AM", "5:00 PM")),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_attendance_with_reversed_punches_is_rejected() {
    let (_dir, router) = create_router_for_test();
    send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, "Manuel", "100", "20000")),
    )
    .await;

    let (status, error) = send_json(
        &router,
        "POST",
        "/attendance",
        Some(create_attendance_body(10001, "2024-06-03", "5:00 PM", "8:00 AM")),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_list_attendance_filters_by_period() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;
    send_json(
        &router,
        "POST",
        "/attendance",
        Some(create_attendance_body(10001, "2024-06-20", "8:00 AM", "5:00 PM")),
    )
    .await;

    let (status, records) = send_json(
        &router,
        "GET",
        "/employees/10001/attendance?start=2024-06-01&end=2024-06-15",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let records = records.as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["date"], "2024-06-03");
}

// =============================================================================
// SECTION 3: Payslip Tests
// =============================================================================

#[tokio::test]
async fn test_payslip_for_late_day() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (status, payslip) = send_json(
        &router,
        "GET",
        "/employees/10001/payslip?start=2024-06-03&end=2024-06-07",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(payslip["employee_name"], "Manuel Garcia");
    assert_eq!(payslip["hours"]["days_worked"], 1);
    assert_amount(&payslip, "gross_pay", "800.00");
    assert_amount(&payslip, "tardiness_deduction", "83.33");
    assert_amount(&payslip["contributions"], "pagibig", "60.00");
}

#[tokio::test]
async fn test_payslip_has_audit_trace() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (_, payslip) = send_json(
        &router,
        "GET",
        "/employees/10001/payslip?start=2024-06-03&end=2024-06-07",
        None,
    )
    .await;

    let rule_ids: Vec<&str> = payslip["audit_trace"]
        .as_array()
        .unwrap()
        .iter()
        .map(|step| step["rule_id"].as_str().unwrap())
        .collect();
    assert_eq!(
        rule_ids,
        vec![
            "attendance_aggregation",
            "gross_pay",
            "tardiness_deduction",
            "statutory_contributions",
            "withholding_tax",
            "net_pay",
        ]
    );
}

#[tokio::test]
async fn test_payslip_text_rendering() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (status, bytes) = send(
        &router,
        "GET",
        "/employees/10001/payslip/text?start=2024-06-03&end=2024-06-07",
        None,
    )
    .await;
    let text = String::from_utf8(bytes).unwrap();

    assert_eq!(status, StatusCode::OK);
    assert!(text.starts_with("MotorPH Payslip"));
    assert!(text.contains("Gross Pay: P800.00"));
    assert!(text.contains("Tardiness Deduction: P83.33"));
}

#[tokio::test]
async fn test_payslip_with_config_from_disk() {
    let dir = TempDir::new().unwrap();
    let config = ConfigLoader::load("./config/motorph")
        .expect("Failed to load config")
        .into_config();
    let router = create_router(AppState::new(PayrollService::open(dir.path(), config)));
    seed_late_day(&router).await;

    let (status, payslip) = send_json(
        &router,
        "GET",
        "/employees/10001/payslip?start=2024-06-03&end=2024-06-07",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_amount(&payslip, "gross_pay", "800.00");
}

#[tokio::test]
async fn test_payslip_without_attendance_is_unprocessable() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (status, error) = send_json(
        &router,
        "GET",
        "/employees/10001/payslip?start=2024-07-01&end=2024-07-15",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(error["code"], "NO_ATTENDANCE");
}

#[tokio::test]
async fn test_payslip_for_unknown_employee_is_not_found() {
    let (_dir, router) = create_router_for_test();

    let (status, _) = send_json(
        &router,
        "GET",
        "/employees/99999/payslip?start=2024-06-03&end=2024-06-07",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_payslip_with_reversed_period_is_rejected() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (status, error) = send_json(
        &router,
        "GET",
        "/employees/10001/payslip?start=2024-06-07&end=2024-06-03",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_payslip_with_bad_query_is_rejected() {
    let (_dir, router) = create_router_for_test();

    let (status, error) = send_json(
        &router,
        "GET",
        "/employees/10001/payslip?start=06/03/2024",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

// =============================================================================
// SECTION 4: Account Tests
// =============================================================================

#[tokio::test]
async fn test_sync_creates_pending_accounts_once() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;

    let (status, synced) = send_json(&router, "POST", "/users/sync", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(synced["created"], 1);

    let (_, synced) = send_json(&router, "POST", "/users/sync", None).await;
    assert_eq!(synced["created"], 0);

    let (_, users) = send_json(&router, "GET", "/users", None).await;
    let users = users.as_array().unwrap();
    assert_eq!(users[0]["username"], "10001");
    assert_eq!(users[0]["role"], "Employee");
    assert!(users[0].get("password").is_none());
}

#[tokio::test]
async fn test_pending_account_cannot_login_until_activated() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;
    send_json(&router, "POST", "/users/sync", None).await;

    let (status, error) = send_json(
        &router,
        "POST",
        "/auth/login",
        Some(json!({ "username": "10001", "password": "" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(error["code"], "INVALID_CREDENTIALS");

    let (status, _) = send_json(
        &router,
        "PUT",
        "/users/by-employee/10001",
        Some(json!({ "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, user) = send_json(
        &router,
        "POST",
        "/auth/login",
        Some(json!({ "username": "10001", "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["employee_id"], 10001);
}

#[tokio::test]
async fn test_create_user_and_login_ignores_username_case() {
    let (_dir, router) = create_router_for_test();

    let (status, created) = send_json(
        &router,
        "POST",
        "/users",
        Some(json!({
            "username": "hr.motorph",
            "password": "hr123",
            "role": "HR",
            "first_name": "Human",
            "last_name": "Resources"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["role"], "HR");

    let (status, user) = send_json(
        &router,
        "POST",
        "/auth/login",
        Some(json!({ "username": "HR.MotorPH", "password": "hr123" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "hr.motorph");

    let (status, _) = send_json(
        &router,
        "POST",
        "/auth/login",
        Some(json!({ "username": "hr.motorph", "password": "HR123" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_user_linked_to_unknown_employee_is_not_found() {
    let (_dir, router) = create_router_for_test();

    let (status, _) = send_json(
        &router,
        "POST",
        "/users",
        Some(json!({
            "username": "jdoe",
            "password": "pw",
            "role": "Employee",
            "first_name": "Jane",
            "employee_id": 99999
        })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_edit_user_without_account_is_not_found() {
    let (_dir, router) = create_router_for_test();

    let (status, _) = send_json(
        &router,
        "PUT",
        "/users/by-employee/10001",
        Some(json!({ "password": "pw" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// SECTION 5: Error Cases Tests
// =============================================================================

#[tokio::test]
async fn test_malformed_json_returns_400() {
    let (_dir, router) = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/employees")
                .header("Content-Type", "application/json")
                .body(Body::from("{ not json"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json: Value = serde_json::from_slice(&body_bytes).unwrap();
    assert_eq!(json["code"], "MALFORMED_JSON");
}

#[tokio::test]
async fn test_missing_field_returns_validation_error() {
    let (_dir, router) = create_router_for_test();

    let (status, error) = send_json(
        &router,
        "POST",
        "/employees",
        Some(json!({ "id": 10001, "first_name": "Manuel" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_missing_content_type_returns_400() {
    let (_dir, router) = create_router_for_test();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/auth/login")
                .body(Body::from(r#"{"username":"a","password":"b"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_data_survives_reopening_the_directory() {
    let dir = TempDir::new().unwrap();
    let router = create_router(AppState::new(PayrollService::open(
        dir.path(),
        PayrollConfig::default(),
    )));
    seed_late_day(&router).await;
    drop(router);

    let reopened = create_router(AppState::new(PayrollService::open(
        dir.path(),
        PayrollConfig::default(),
    )));
    let (status, records) = send_json(
        &reopened,
        "GET",
        "/employees/10001/attendance?start=2024-06-03&end=2024-06-03",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(records[0]["time_in"], "09:00:00");
}

#[tokio::test]
async fn test_punch_seconds_are_dropped_and_payslip_survives_reopen() {
    let dir = TempDir::new().unwrap();
    let open = || {
        create_router(AppState::new(PayrollService::open(
            dir.path(),
            PayrollConfig::default(),
        )))
    };
    let router = open();
    send_json(
        &router,
        "POST",
        "/employees",
        Some(create_employee_body(10001, "Manuel", "100", "3000")),
    )
    .await;

    let (status, record) = send_json(
        &router,
        "POST",
        "/attendance",
        Some(create_attendance_body(10001, "2024-06-03", "09:00:59", "18:00:30")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["time_in"], "09:00:00");
    assert_eq!(record["time_out"], "18:00:00");

    let uri = "/employees/10001/payslip?start=2024-06-03&end=2024-06-07";
    let (_, before) = send_json(&router, "GET", uri, None).await;
    drop(router);
    let (_, after) = send_json(&open(), "GET", uri, None).await;

    assert_amount(&before, "gross_pay", "800.00");
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_padded_password_logs_in_after_reopen() {
    let dir = TempDir::new().unwrap();
    let open = || {
        create_router(AppState::new(PayrollService::open(
            dir.path(),
            PayrollConfig::default(),
        )))
    };
    let login = json!({ "username": "hr", "password": "pw " });

    let router = open();
    let (status, _) = send_json(
        &router,
        "POST",
        "/users",
        Some(json!({
            "username": " hr ",
            "password": "pw ",
            "role": "HR",
            "first_name": "Human"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = send_json(&router, "POST", "/auth/login", Some(login.clone())).await;
    assert_eq!(status, StatusCode::OK);
    drop(router);

    let (status, user) = send_json(&open(), "POST", "/auth/login", Some(login)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["username"], "hr");
}

#[tokio::test]
async fn test_second_account_for_employee_is_conflict() {
    let (_dir, router) = create_router_for_test();
    seed_late_day(&router).await;
    send_json(&router, "POST", "/users/sync", None).await;

    let (status, error) = send_json(
        &router,
        "POST",
        "/users",
        Some(json!({
            "username": "mgarcia",
            "password": "pw",
            "role": "Employee",
            "first_name": "Manuel",
            "employee_id": 10001
        })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["code"], "DUPLICATE_KEY");
}
