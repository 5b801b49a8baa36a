//! HTTP request handlers for the payroll API.
//!
//! This module contains the handler functions for all API endpoints. Every
//! request is tagged with a correlation id that appears in its log lines.

use std::time::Instant;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::error::{EngineError, EngineResult};
use crate::models::{Employee, EmployeeUpdate, User, UserUpdate};

use super::request::{
    AttendanceRequest, EmployeeRequest, LoginRequest, PeriodQuery, SyncResponse, UserRequest,
};
use super::response::{ApiError, ApiErrorResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/:id",
            get(get_employee).patch(edit_employee).delete(delete_employee),
        )
        .route("/employees/:id/profile", get(employee_profile))
        .route("/employees/:id/attendance", get(employee_attendance))
        .route("/employees/:id/payslip", get(employee_payslip))
        .route("/employees/:id/payslip/text", get(employee_payslip_text))
        .route("/attendance", post(create_attendance))
        .route("/auth/login", post(login))
        .route("/users", get(list_users).post(create_user))
        .route("/users/by-employee/:id", put(edit_user))
        .route("/users/sync", post(sync_users))
        .with_state(state)
}

// ============================================================================
// Employees
// ============================================================================

/// Handler for GET /employees.
async fn list_employees(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing employees");
    respond(correlation_id, || {
        Ok(json_response(StatusCode::OK, state.service().list_employees()?))
    })
}

/// Handler for POST /employees.
async fn create_employee(
    State(state): State<AppState>,
    payload: Result<Json<EmployeeRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, employee_id = request.id, "Creating employee");

    respond(correlation_id, || {
        let employee: Employee = request.into();
        let id = employee.id;
        if !state.service().add_employee(employee)? {
            return Err(EngineError::duplicate("employee", id));
        }
        let created = state
            .service()
            .get_employee(id)?
            .ok_or_else(|| EngineError::not_found("employee", id))?;
        Ok(json_response(StatusCode::CREATED, created))
    })
}

/// Handler for GET /employees/:id.
async fn get_employee(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Fetching employee");
    respond(correlation_id, || {
        let employee = state
            .service()
            .get_employee(id)?
            .ok_or_else(|| EngineError::not_found("employee", id))?;
        Ok(json_response(StatusCode::OK, employee))
    })
}

/// Handler for GET /employees/:id/profile.
async fn employee_profile(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Rendering profile");
    respond(correlation_id, || {
        let employee = state
            .service()
            .get_employee(id)?
            .ok_or_else(|| EngineError::not_found("employee", id))?;
        Ok(text_response(employee.profile()))
    })
}

/// Handler for PATCH /employees/:id.
///
/// Blank strings and negative amounts in the body leave fields unchanged.
async fn edit_employee(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    payload: Result<Json<EmployeeUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, employee_id = id, "Editing employee");

    respond(correlation_id, || {
        if !state.service().edit_employee(id, update)? {
            return Err(EngineError::not_found("employee", id));
        }
        let edited = state
            .service()
            .get_employee(id)?
            .ok_or_else(|| EngineError::not_found("employee", id))?;
        Ok(json_response(StatusCode::OK, edited))
    })
}

/// Handler for DELETE /employees/:id.
///
/// Also removes the employee's attendance and linked account.
async fn delete_employee(State(state): State<AppState>, Path(id): Path<u32>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, employee_id = id, "Deleting employee");
    respond(correlation_id, || {
        if !state.service().delete_employee(id)? {
            return Err(EngineError::not_found("employee", id));
        }
        Ok(StatusCode::NO_CONTENT.into_response())
    })
}

// ============================================================================
// Attendance
// ============================================================================

/// Handler for GET /employees/:id/attendance?start=&end=.
async fn employee_attendance(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = match query {
        Ok(Query(period)) => period,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = id,
        start = %period.start,
        end = %period.end,
        "Listing attendance"
    );
    respond(correlation_id, || {
        let records = state
            .service()
            .get_attendance_for(id, period.start, period.end)?;
        Ok(json_response(StatusCode::OK, records))
    })
}

/// Handler for POST /attendance.
///
/// A second record for the same employee and day is a conflict.
async fn create_attendance(
    State(state): State<AppState>,
    payload: Result<Json<AttendanceRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(
        correlation_id = %correlation_id,
        employee_id = request.employee_id,
        date = %request.date,
        "Recording attendance"
    );

    respond(correlation_id, || {
        let added = state.service().add_attendance(
            request.employee_id,
            request.date,
            request.time_in,
            request.time_out,
        )?;
        if !added {
            return Err(EngineError::duplicate(
                "attendance",
                format!("{}@{}", request.employee_id, request.date),
            ));
        }
        let record = state
            .service()
            .get_attendance_for(request.employee_id, request.date, request.date)?
            .into_iter()
            .next()
            .ok_or_else(|| EngineError::not_found("attendance", request.date))?;
        Ok(json_response(StatusCode::CREATED, record))
    })
}

// ============================================================================
// Payroll
// ============================================================================

/// Handler for GET /employees/:id/payslip?start=&end=.
async fn employee_payslip(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = match query {
        Ok(Query(period)) => period,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, employee_id = id, "Processing payslip request");

    let start_time = Instant::now();
    respond(correlation_id, || {
        let payslip = state
            .service()
            .compute_payslip(id, period.start, period.end)?;
        info!(
            correlation_id = %correlation_id,
            employee_id = id,
            days_worked = payslip.hours.days_worked,
            net_pay = %payslip.net_pay,
            duration_us = start_time.elapsed().as_micros(),
            "Payslip computed successfully"
        );
        Ok(json_response(StatusCode::OK, payslip))
    })
}

/// Handler for GET /employees/:id/payslip/text?start=&end=.
async fn employee_payslip_text(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    query: Result<Query<PeriodQuery>, QueryRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let period = match query {
        Ok(Query(period)) => period,
        Err(rejection) => return query_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, employee_id = id, "Rendering payslip");
    respond(correlation_id, || {
        let payslip = state
            .service()
            .compute_payslip(id, period.start, period.end)?;
        Ok(text_response(payslip.to_string()))
    })
}

// ============================================================================
// Accounts
// ============================================================================

/// Handler for POST /auth/login.
async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, username = %request.username, "Login attempt");

    respond(correlation_id, || {
        match state
            .service()
            .authenticate(&request.username, &request.password)?
        {
            Some(user) => Ok(json_response(StatusCode::OK, user)),
            None => Ok(json_response(
                StatusCode::UNAUTHORIZED,
                ApiError::invalid_credentials(),
            )),
        }
    })
}

/// Handler for GET /users.
async fn list_users(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Listing users");
    respond(correlation_id, || {
        Ok(json_response(StatusCode::OK, state.service().list_users()?))
    })
}

/// Handler for POST /users.
async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<UserRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, username = %request.username, "Creating user");

    respond(correlation_id, || {
        let user: User = request.into();
        let username = user.username.clone();
        if !state.service().add_user(user)? {
            return Err(EngineError::duplicate("user", &username));
        }
        let created = state
            .service()
            .get_user(&username)?
            .ok_or_else(|| EngineError::not_found("user", &username))?;
        Ok(json_response(StatusCode::CREATED, created))
    })
}

/// Handler for PUT /users/by-employee/:id.
async fn edit_user(
    State(state): State<AppState>,
    Path(employee_id): Path<u32>,
    payload: Result<Json<UserUpdate>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    let update = match payload {
        Ok(Json(update)) => update,
        Err(rejection) => return json_rejection_response(correlation_id, rejection),
    };
    info!(correlation_id = %correlation_id, employee_id, "Editing user");

    respond(correlation_id, || {
        if !state.service().edit_user(employee_id, update)? {
            return Err(EngineError::not_found("user for employee", employee_id));
        }
        let edited = state
            .service()
            .get_user_for_employee(employee_id)?
            .ok_or_else(|| EngineError::not_found("user for employee", employee_id))?;
        Ok(json_response(StatusCode::OK, edited))
    })
}

/// Handler for POST /users/sync.
async fn sync_users(State(state): State<AppState>) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Synchronizing user accounts");
    respond(correlation_id, || {
        let created = state.service().sync_users()?;
        Ok(json_response(StatusCode::OK, SyncResponse { created }))
    })
}

// ============================================================================
// Helpers
// ============================================================================

/// Runs a handler body, turning an engine error into its API response.
fn respond<F>(correlation_id: Uuid, body: F) -> Response
where
    F: FnOnce() -> EngineResult<Response>,
{
    body().unwrap_or_else(|err| {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Request failed"
        );
        let api_error: ApiErrorResponse = err.into();
        (
            api_error.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(api_error.error),
        )
            .into_response()
    })
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (
        status,
        [(header::CONTENT_TYPE, "application/json")],
        Json(body),
    )
        .into_response()
}

fn text_response(body: String) -> Response {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        body,
    )
        .into_response()
}

fn json_rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // Get the body text which contains the detailed error from serde
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            ApiError::validation_error(body_text)
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

fn query_rejection_response(correlation_id: Uuid, rejection: QueryRejection) -> Response {
    let body_text = rejection.body_text();
    warn!(
        correlation_id = %correlation_id,
        error = %body_text,
        "Query string error"
    );
    json_response(
        StatusCode::BAD_REQUEST,
        ApiError::with_details(
            "VALIDATION_ERROR",
            body_text,
            "Expected start and end dates as YYYY-MM-DD",
        ),
    )
}
