//! Token model: one patient's place in the queue

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Prefix shared by every display token number
pub const TOKEN_PREFIX: &str = "Q";

/// Priority class of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Emergency,
}

impl Priority {
    /// Normalize a submitted marker. Only the literal `emergency` is an emergency.
    pub fn from_marker(marker: Option<&str>) -> Self {
        match marker {
            Some("emergency") => Priority::Emergency,
            _ => Priority::Normal,
        }
    }

    pub fn is_emergency(&self) -> bool {
        matches!(self, Priority::Emergency)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Emergency => "emergency",
        }
    }
}

/// Lifecycle state of a token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenStatus {
    Waiting,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
}

impl TokenStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TokenStatus::Waiting => "Waiting",
            TokenStatus::InProgress => "In Progress",
            TokenStatus::Completed => "Completed",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub token_number: String,
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub problem: String,
    pub priority: Priority,
    pub status: TokenStatus,
    pub created_at: DateTime<Utc>,
}

impl Token {
    /// Issue a fresh waiting token for the given counter value
    pub fn issue(number: u32, patient: NewToken) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            token_number: format_token_number(number),
            patient_name: patient.patient_name,
            age: patient.age,
            gender: patient.gender,
            problem: patient.problem,
            priority: patient.priority,
            status: TokenStatus::Waiting,
            created_at: Utc::now(),
        }
    }

    pub fn is_waiting(&self) -> bool {
        self.status == TokenStatus::Waiting
    }

    pub fn is_in_progress(&self) -> bool {
        self.status == TokenStatus::InProgress
    }

    /// Numeric part of the token number, if it parses
    pub fn sequence(&self) -> Option<u32> {
        self.token_number
            .strip_prefix(TOKEN_PREFIX)
            .and_then(|digits| digits.parse().ok())
    }
}

/// Patient-supplied fields of a submission, already normalized
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewToken {
    pub patient_name: String,
    pub age: u32,
    pub gender: String,
    pub problem: String,
    pub priority: Priority,
}

impl NewToken {
    pub fn new(
        patient_name: &str,
        age: u32,
        gender: &str,
        problem: &str,
        priority: Priority,
    ) -> Self {
        Self {
            patient_name: patient_name.to_string(),
            age,
            gender: gender.to_string(),
            problem: problem.to_string(),
            priority,
        }
    }
}

/// Raw submission body as it arrives over the wire.
///
/// `age` may be a number, a numeric string or missing; `priority` may be
/// anything. Use [`SubmitTokenRequest::validate`] to turn it into a
/// [`NewToken`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTokenRequest {
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub age: Option<Value>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub problem: Option<String>,
    #[serde(default)]
    pub priority: Option<String>,
}

impl SubmitTokenRequest {
    /// Check required fields and normalize the rest.
    ///
    /// Returns `None` when `patientName` or `problem` is missing or blank.
    pub fn validate(&self) -> Option<NewToken> {
        let patient_name = non_blank(self.patient_name.as_deref())?;
        let problem = non_blank(self.problem.as_deref())?;

        Some(NewToken {
            patient_name: patient_name.to_string(),
            age: self.age.as_ref().map(coerce_age).unwrap_or(0),
            gender: self.gender.clone().unwrap_or_default(),
            problem: problem.to_string(),
            priority: Priority::from_marker(self.priority.as_deref()),
        })
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Format a counter value as a display token number (`7` -> `Q007`)
pub fn format_token_number(number: u32) -> String {
    format!("{}{:03}", TOKEN_PREFIX, number)
}

/// Coerce a loosely typed age to a non-negative integer, defaulting to 0
pub fn coerce_age(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                clamp_age(i)
            } else {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| clamp_age(f.trunc() as i64))
                    .unwrap_or(0)
            }
        }
        Value::String(s) => parse_leading_integer(s).map(clamp_age).unwrap_or(0),
        _ => 0,
    }
}

fn clamp_age(value: i64) -> u32 {
    value.clamp(0, u32::MAX as i64) as u32
}

/// Parse an optional sign and leading decimal digits, ignoring the rest
fn parse_leading_integer(input: &str) -> Option<i64> {
    let trimmed = input.trim_start();
    let (negative, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (true, &trimmed[1..]),
        Some(b'+') => (false, &trimmed[1..]),
        _ => (false, trimmed),
    };

    let digits: String = rest.chars().take_while(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }

    let magnitude: i64 = digits.parse().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}
