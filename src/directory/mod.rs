//! Hospital directory: departments, doctors and appointment bookings
//!
//! Plain lookup and list mutation over in-memory collections seeded from
//! `data/seed.yaml`. The admin dashboard reads on-duty doctors and today's
//! appointment count from here.

pub mod models;

pub use models::{
    Appointment, Department, Doctor, DoctorOnDuty, HospitalStats, NewAppointment, NewDoctor,
};

use crate::queue::token::coerce_age;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::info;

const SEED_YAML: &str = include_str!("../../data/seed.yaml");

/// Number of departments listed as featured services
const FEATURED_SERVICES: usize = 6;
/// First id handed out to doctors added at runtime
const FIRST_DOCTOR_ID: u32 = 20;

pub const DOCTOR_NOT_FOUND: &str = "Doctor not found";
pub const DEPARTMENT_NOT_FOUND: &str = "Department not found";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("Failed to parse directory seed data: {0}")]
    Seed(#[from] serde_yaml::Error),
}

pub type DirectoryResult<T> = Result<T, DirectoryError>;

pub type SharedDirectory = Arc<RwLock<Directory>>;

#[derive(Debug, Deserialize)]
struct SeedFile {
    hospital: HospitalStats,
    departments: Vec<Department>,
    doctors: Vec<Doctor>,
}

#[derive(Debug)]
pub struct Directory {
    hospital: HospitalStats,
    departments: Vec<Department>,
    doctors: Vec<Doctor>,
    appointments: Vec<Appointment>,
    next_doctor_id: u32,
    next_appointment_seq: u64,
}

impl Directory {
    /// Build the directory from the bundled seed data. Every doctor starts
    /// off duty.
    pub fn from_seed() -> DirectoryResult<Self> {
        Self::from_yaml(SEED_YAML)
    }

    pub fn from_yaml(yaml: &str) -> DirectoryResult<Self> {
        let seed: SeedFile = serde_yaml::from_str(yaml)?;
        let doctors = seed
            .doctors
            .into_iter()
            .map(|doctor| Doctor {
                on_duty: false,
                ..doctor
            })
            .collect::<Vec<_>>();

        info!(
            "Loaded directory: {} departments, {} doctors",
            seed.departments.len(),
            doctors.len()
        );

        Ok(Self {
            hospital: seed.hospital,
            departments: seed.departments,
            doctors,
            appointments: Vec::new(),
            next_doctor_id: FIRST_DOCTOR_ID,
            next_appointment_seq: 1,
        })
    }

    pub fn into_shared(self) -> SharedDirectory {
        Arc::new(RwLock::new(self))
    }

    pub fn hospital_stats(&self) -> &HospitalStats {
        &self.hospital
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn department(&self, id: &str) -> DirectoryResult<&Department> {
        self.departments
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| DirectoryError::NotFound(DEPARTMENT_NOT_FOUND.to_string()))
    }

    pub fn featured_services(&self) -> &[Department] {
        let end = self.departments.len().min(FEATURED_SERVICES);
        &self.departments[..end]
    }

    /// Doctors, optionally filtered by a case-insensitive department substring
    pub fn doctors(&self, department: Option<&str>) -> Vec<Doctor> {
        let filter = department
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_lowercase);

        self.doctors
            .iter()
            .filter(|d| match &filter {
                Some(f) => d.department.to_lowercase().contains(f.as_str()),
                None => true,
            })
            .cloned()
            .collect()
    }

    pub fn doctor(&self, id: &str) -> DirectoryResult<&Doctor> {
        self.doctors
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| DirectoryError::NotFound(DOCTOR_NOT_FOUND.to_string()))
    }

    pub fn add_doctor(&mut self, request: NewDoctor) -> DirectoryResult<Doctor> {
        let name = request
            .name
            .as_deref()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .ok_or_else(|| DirectoryError::Validation("Name is required".to_string()))?;

        let doctor = Doctor {
            id: format!("doc-{}", self.next_doctor_id),
            name: name.to_string(),
            department: non_empty_or(request.department, "General"),
            specialization: request.specialization.unwrap_or_default(),
            experience: request.experience.as_ref().map(coerce_age).unwrap_or(0),
            availability: non_empty_or(request.availability, "Mon, Wed, Fri"),
            contact: request.contact.unwrap_or_default(),
            on_duty: false,
        };
        self.next_doctor_id += 1;
        self.doctors.push(doctor.clone());

        info!("Added doctor {} ({})", doctor.name, doctor.id);
        Ok(doctor)
    }

    pub fn delete_doctor(&mut self, id: &str) -> DirectoryResult<Doctor> {
        let index = self
            .doctors
            .iter()
            .position(|d| d.id == id)
            .ok_or_else(|| DirectoryError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        let removed = self.doctors.remove(index);
        info!("Deleted doctor {}", removed.id);
        Ok(removed)
    }

    pub fn toggle_on_duty(&mut self, id: &str) -> DirectoryResult<Doctor> {
        let doctor = self
            .doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| DirectoryError::NotFound(DOCTOR_NOT_FOUND.to_string()))?;

        doctor.on_duty = !doctor.on_duty;
        info!("Doctor {} on duty: {}", doctor.id, doctor.on_duty);
        Ok(doctor.clone())
    }

    pub fn doctors_on_duty(&self) -> Vec<DoctorOnDuty> {
        self.doctors
            .iter()
            .filter(|d| d.on_duty)
            .map(DoctorOnDuty::from)
            .collect()
    }

    pub fn create_appointment(&mut self, request: NewAppointment) -> DirectoryResult<Appointment> {
        let missing = || {
            DirectoryError::Validation(
                "Missing required fields: patientName, department, date, timeSlot".to_string(),
            )
        };
        let patient_name = required(&request.patient_name).ok_or_else(missing)?;
        let department = required(&request.department).ok_or_else(missing)?;
        let date_input = required(&request.date).ok_or_else(missing)?;
        let time_slot = required(&request.time_slot).ok_or_else(missing)?;

        let date = parse_date(date_input)
            .ok_or_else(|| DirectoryError::Validation(format!("Invalid date: {}", date_input)))?;

        let now = Utc::now();
        let appointment = Appointment {
            id: format!("apt-{}-{}", now.timestamp_millis(), self.next_appointment_seq),
            patient_name: patient_name.to_string(),
            phone: request.phone.as_deref().unwrap_or_default().trim().to_string(),
            department: department.to_string(),
            doctor_id: request.doctor_id.filter(|id| !id.is_empty()),
            doctor_name: request.doctor_name.filter(|name| !name.is_empty()),
            date,
            time_slot: time_slot.to_string(),
            status: "Pending".to_string(),
            token_number: None,
            created_at: now,
        };
        self.next_appointment_seq += 1;
        self.appointments.push(appointment.clone());

        info!("Booked appointment {} for {}", appointment.id, appointment.date);
        Ok(appointment)
    }

    pub fn appointments(&self) -> &[Appointment] {
        &self.appointments
    }

    /// Case-insensitive match on patient name, plain substring on phone.
    /// A blank query matches nothing.
    pub fn search_appointments(&self, query: &str) -> Vec<Appointment> {
        let q = query.trim().to_lowercase();
        if q.is_empty() {
            return Vec::new();
        }

        self.appointments
            .iter()
            .filter(|a| {
                a.patient_name.to_lowercase().contains(&q)
                    || (!a.phone.is_empty() && a.phone.contains(&q))
            })
            .cloned()
            .collect()
    }

    pub fn count_appointments_on(&self, date: NaiveDate) -> usize {
        self.appointments.iter().filter(|a| a.date == date).count()
    }
}

fn required(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn non_empty_or(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn parse_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(input)
                .ok()
                .map(|dt| dt.with_timezone(&Utc).date_naive())
        })
}
