//! Directory endpoints: departments, doctors, appointments, hospital info

use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use super::envelope::{ApiError, ApiResponse, ApiResult};
use super::AppState;
use crate::directory::{
    Appointment, Department, DirectoryError, Doctor, HospitalStats, NewAppointment, NewDoctor,
};

impl From<DirectoryError> for ApiError {
    fn from(err: DirectoryError) -> Self {
        match err {
            DirectoryError::Validation(message) => ApiError::BadRequest(message),
            DirectoryError::NotFound(message) => ApiError::NotFound(message),
            DirectoryError::Seed(e) => ApiError::Internal(e.to_string()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct DoctorQuery {
    pub department: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

fn json_body<T>(body: Result<Json<T>, JsonRejection>) -> Result<T, ApiError> {
    body.map(|Json(value)| value)
        .map_err(|e| ApiError::BadRequest(e.body_text()))
}

pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::list(directory.departments().to_vec()))
}

pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Department> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::ok(directory.department(&id)?.clone()))
}

pub async fn list_doctors(
    State(state): State<AppState>,
    Query(query): Query<DoctorQuery>,
) -> ApiResult<Vec<Doctor>> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::list(directory.doctors(query.department.as_deref())))
}

pub async fn get_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Doctor> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::ok(directory.doctor(&id)?.clone()))
}

pub async fn add_doctor(
    State(state): State<AppState>,
    body: Result<Json<NewDoctor>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Doctor>), ApiError> {
    let request = json_body(body)?;
    let doctor = state.directory.write().await.add_doctor(request)?;
    Ok((StatusCode::CREATED, ApiResponse::ok(doctor)))
}

pub async fn delete_doctor(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<()> {
    state.directory.write().await.delete_doctor(&id)?;
    Ok(ApiResponse::message_only("Doctor deleted"))
}

pub async fn toggle_on_duty(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Doctor> {
    let doctor = state.directory.write().await.toggle_on_duty(&id)?;
    Ok(ApiResponse::ok(doctor))
}

pub async fn list_appointments(State(state): State<AppState>) -> ApiResult<Vec<Appointment>> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::list(directory.appointments().to_vec()))
}

pub async fn create_appointment(
    State(state): State<AppState>,
    body: Result<Json<NewAppointment>, JsonRejection>,
) -> Result<(StatusCode, ApiResponse<Appointment>), ApiError> {
    let request = json_body(body)?;
    let appointment = state.directory.write().await.create_appointment(request)?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::ok(appointment).with_message("Appointment submitted successfully"),
    ))
}

pub async fn search_appointments(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Vec<Appointment>> {
    let directory = state.directory.read().await;
    let results = directory.search_appointments(query.q.as_deref().unwrap_or_default());
    Ok(ApiResponse::list(results))
}

pub async fn hospital_stats(State(state): State<AppState>) -> ApiResult<HospitalStats> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::ok(directory.hospital_stats().clone()))
}

pub async fn hospital_services(State(state): State<AppState>) -> ApiResult<Vec<Department>> {
    let directory = state.directory.read().await;
    Ok(ApiResponse::ok(directory.featured_services().to_vec()))
}
