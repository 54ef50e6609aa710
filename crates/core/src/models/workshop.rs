use chrono::{DateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::serde_fmt::hhmm;

/// A named working-hours window within a workshop's day, e.g. "Morning"
/// 09:00-13:00. `slots_per_shift` is informational only; actual capacity is
/// derived from the mechanic roster.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub name: String,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    #[serde(default = "default_slots_per_shift")]
    pub slots_per_shift: i32,
}

fn default_slots_per_shift() -> i32 {
    2
}

impl Shift {
    /// A shift window is valid when it starts strictly before it ends.
    pub fn is_valid_window(&self) -> bool {
        self.start_time < self.end_time
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workshop {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateWorkshopRequest {
    pub name: Option<String>,
    pub location: Option<String>,
    pub contact: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateShiftsRequest {
    pub shifts: Vec<Shift>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkshopDetailsResponse {
    #[serde(flatten)]
    pub workshop: Workshop,
    pub shifts: Vec<Shift>,
    pub services: Vec<super::service::Service>,
}
