use crate::dtos::{CreateStudentRequest, MessageResponse, UpdateStudentRequest};
use crate::models::Student;
use crate::services::record_operation;
use crate::startup::AppState;
use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use service_core::error::AppError;

const STUDENT_NOT_FOUND: &str = "Student not found";
const NO_NAME_MATCHES: &str = "No students found with the given name";
const MISSING_NAME: &str = "Missing 'name'";
const NO_UPDATE_FIELDS: &str = "No valid fields to update";

fn not_found(message: &'static str) -> AppError {
    AppError::NotFound(anyhow::anyhow!(message))
}

fn outcome<T>(result: &Result<T, AppError>, found: impl FnOnce(&T) -> bool) -> &'static str {
    match result {
        Ok(value) if found(value) => "ok",
        Ok(_) => "not_found",
        Err(_) => "error",
    }
}

/// Records exactly one outcome per store call; `found` decides `ok` vs `not_found`.
fn track<T>(
    operation: &'static str,
    result: Result<T, AppError>,
    found: impl FnOnce(&T) -> bool,
) -> Result<T, AppError> {
    record_operation(operation, outcome(&result, found));
    result
}

/// A path segment that does not decode (e.g. invalid UTF-8) can never name a record.
fn path_or_not_found(
    path: Result<Path<String>, PathRejection>,
    message: &'static str,
) -> Result<String, AppError> {
    path.map(|Path(value)| value).map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected path segment");
        not_found(message)
    })
}

pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<CreateStudentRequest>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected create payload");
        AppError::BadRequest(anyhow::anyhow!(MISSING_NAME))
    })?;
    let new_student = req.into_new_student()?;

    let student = track("create", state.store.create(new_student).await, |_| true)?;

    Ok((StatusCode::CREATED, Json(student)))
}

pub async fn update_student(
    State(state): State<AppState>,
    student_id: Result<Path<String>, PathRejection>,
    payload: Result<Json<UpdateStudentRequest>, JsonRejection>,
) -> Result<Json<Student>, AppError> {
    let student_id = path_or_not_found(student_id, STUDENT_NOT_FOUND)?;
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected update payload");
        AppError::BadRequest(anyhow::anyhow!(NO_UPDATE_FIELDS))
    })?;

    track(
        "update",
        state.store.update(&student_id, req.into()).await,
        Option::is_some,
    )?
    .map(Json)
    .ok_or_else(|| not_found(STUDENT_NOT_FOUND))
}

pub async fn list_students(State(state): State<AppState>) -> Result<Json<Vec<Student>>, AppError> {
    let students = track("list", state.store.get_all().await, |_| true)?;
    Ok(Json(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    student_id: Result<Path<String>, PathRejection>,
) -> Result<Json<Student>, AppError> {
    let student_id = path_or_not_found(student_id, STUDENT_NOT_FOUND)?;

    track(
        "get",
        state.store.get_by_id(&student_id).await,
        Option::is_some,
    )?
        .map(Json)
        .ok_or_else(|| not_found(STUDENT_NOT_FOUND))
}

pub async fn delete_student(
    State(state): State<AppState>,
    student_id: Result<Path<String>, PathRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let student_id = path_or_not_found(student_id, STUDENT_NOT_FOUND)?;
    let deleted = track(
        "delete",
        state.store.delete_by_id(&student_id).await,
        |deleted| *deleted,
    )?;

    if !deleted {
        return Err(not_found(STUDENT_NOT_FOUND));
    }

    tracing::info!(student_id = %student_id, "Student deleted");
    Ok(Json(MessageResponse {
        message: "Deleted".to_string(),
    }))
}

/// Empty results are reported as 404 rather than an empty list.
pub async fn search_students(
    State(state): State<AppState>,
    fragment: Result<Path<String>, PathRejection>,
) -> Result<Json<Vec<Student>>, AppError> {
    let fragment = path_or_not_found(fragment, NO_NAME_MATCHES)?;
    let students = track(
        "search",
        state.store.search_by_name(&fragment).await,
        |students| !students.is_empty(),
    )?;

    if students.is_empty() {
        return Err(not_found(NO_NAME_MATCHES));
    }

    Ok(Json(students))
}
