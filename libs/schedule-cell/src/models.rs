// libs/schedule-cell/src/models.rs
use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ==============================================================================
// TIME SLOT MODELS
// ==============================================================================

/// A doctor-declared availability window on a calendar day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeSlot {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub is_booked: bool,
    pub created_at: DateTime<Utc>,
}

/// Incoming slot creation body. Times arrive as "HH:MM" strings and are
/// parsed into `NaiveTime` before any comparison happens.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimeSlotRequest {
    pub date: Option<NaiveDate>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

/// A fully validated slot candidate ready for the conflict check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotCandidate {
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

impl CreateTimeSlotRequest {
    /// Exhaustive field validation, run before any conflict or store logic.
    pub fn validate(&self) -> Result<SlotCandidate, ScheduleError> {
        let mut missing = Vec::new();
        if self.date.is_none() {
            missing.push("date");
        }
        if self.start_time.is_none() {
            missing.push("startTime");
        }
        if self.end_time.is_none() {
            missing.push("endTime");
        }
        if !missing.is_empty() {
            return Err(ScheduleError::Validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )));
        }

        let start_time = parse_time_of_day(self.start_time.as_deref().unwrap())?;
        let end_time = parse_time_of_day(self.end_time.as_deref().unwrap())?;

        if start_time >= end_time {
            return Err(ScheduleError::Validation(
                "Start time must be before end time".to_string(),
            ));
        }

        Ok(SlotCandidate {
            date: self.date.unwrap(),
            start_time,
            end_time,
        })
    }
}

/// Parse a time-of-day field ("HH:MM", with "HH:MM:SS" accepted for store
/// round-trips) into a comparable `NaiveTime`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ScheduleError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M:%S"))
        .map_err(|_| {
            ScheduleError::Validation(format!("Invalid time of day: {}", value))
        })
}

// ==============================================================================
// ERROR TYPES
// ==============================================================================

#[derive(Debug, Clone, thiserror::Error)]
pub enum ScheduleError {
    #[error("Time slot not found")]
    NotFound,

    #[error("A time slot already exists in this interval")]
    Conflict,

    #[error("Cannot delete a booked time slot")]
    SlotBooked,

    #[error("Time slot belongs to another doctor")]
    NotOwner,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Database error: {0}")]
    Database(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(date: Option<&str>, start: Option<&str>, end: Option<&str>) -> CreateTimeSlotRequest {
        CreateTimeSlotRequest {
            date: date.map(|d| d.parse().unwrap()),
            start_time: start.map(str::to_string),
            end_time: end.map(str::to_string),
        }
    }

    #[test]
    fn validate_accepts_well_formed_request() {
        let candidate = request(Some("2024-06-01"), Some("09:00"), Some("09:30"))
            .validate()
            .expect("valid request");
        assert_eq!(candidate.start_time, NaiveTime::from_hms_opt(9, 0, 0).unwrap());
        assert_eq!(candidate.end_time, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
    }

    #[test]
    fn validate_reports_all_missing_fields() {
        let err = request(None, None, Some("09:30")).validate().unwrap_err();
        match err {
            ScheduleError::Validation(msg) => {
                assert!(msg.contains("date"));
                assert!(msg.contains("startTime"));
                assert!(!msg.contains("endTime"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn validate_rejects_inverted_interval() {
        let err = request(Some("2024-06-01"), Some("10:00"), Some("09:00"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn validate_rejects_empty_interval() {
        let err = request(Some("2024-06-01"), Some("09:00"), Some("09:00"))
            .validate()
            .unwrap_err();
        assert!(matches!(err, ScheduleError::Validation(_)));
    }

    #[test]
    fn parse_time_of_day_accepts_both_formats() {
        assert_eq!(
            parse_time_of_day("09:05").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert_eq!(
            parse_time_of_day("09:05:00").unwrap(),
            NaiveTime::from_hms_opt(9, 5, 0).unwrap()
        );
        assert!(parse_time_of_day("9am").is_err());
    }
}
