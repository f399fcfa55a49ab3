//! Admin control panel: shared-credential login and dashboard statistics

use crate::config::AdminConfig;
use crate::directory::{Directory, DoctorOnDuty};
use crate::queue::QueueState;
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminStats {
    pub total_patients_today: usize,
    pub active_queues_count: usize,
    pub appointments_today: usize,
    pub doctors_on_duty: Vec<DoctorOnDuty>,
}

/// Plain equality against the configured credential
pub fn check_login(config: &AdminConfig, request: &LoginRequest) -> bool {
    request.username.as_deref() == Some(config.username.as_str())
        && request.password.as_deref() == Some(config.password.as_str())
}

/// Dashboard numbers for the given local day
pub fn dashboard_stats(queue: &QueueState, directory: &Directory, today: NaiveDate) -> AdminStats {
    AdminStats {
        total_patients_today: queue.today_tokens(today).len(),
        active_queues_count: queue.active_queues_count(today),
        appointments_today: directory.count_appointments_on(today),
        doctors_on_duty: directory.doctors_on_duty(),
    }
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::directory::NewAppointment;
    use crate::queue::{NewToken, Priority};

    fn login(username: &str, password: &str) -> LoginRequest {
        LoginRequest {
            username: Some(username.to_string()),
            password: Some(password.to_string()),
        }
    }

    #[test]
    fn test_check_login() {
        let config = AdminConfig::default();
        assert!(check_login(&config, &login("admin", "admin123")));
        assert!(!check_login(&config, &login("admin", "wrong")));
        assert!(!check_login(&config, &LoginRequest::default()));
    }

    #[test]
    fn test_dashboard_stats() {
        let mut queue = QueueState::new();
        queue.submit(NewToken::new("A", 30, "Male", "ENT", Priority::Normal));
        queue.submit(NewToken::new("B", 30, "Male", "ENT", Priority::Normal));
        queue.submit(NewToken::new("C", 30, "Male", "Dental", Priority::Normal));
        queue.call_next();

        let mut directory = Directory::from_seed().unwrap();
        directory.toggle_on_duty("doc-12").unwrap();
        let today = today();
        directory
            .create_appointment(NewAppointment {
                patient_name: Some("D".to_string()),
                department: Some("ENT".to_string()),
                date: Some(today.format("%Y-%m-%d").to_string()),
                time_slot: Some("09:00 AM".to_string()),
                ..Default::default()
            })
            .unwrap();

        let stats = dashboard_stats(&queue, &directory, today);
        assert_eq!(stats.total_patients_today, 3);
        assert_eq!(stats.active_queues_count, 2);
        assert_eq!(stats.appointments_today, 1);
        assert_eq!(stats.doctors_on_duty.len(), 1);
        assert_eq!(stats.doctors_on_duty[0].name, "Dr. Ravi Verma");
    }
}
