use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::schedule::DEFAULT_DURATION_MINUTES;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
}

impl Service {
    /// Interval length this service occupies on the schedule. Falls back to
    /// the 60-minute default when the stored value is unusable.
    pub fn effective_duration(&self) -> i64 {
        if self.duration_minutes > 0 {
            i64::from(self.duration_minutes)
        } else {
            DEFAULT_DURATION_MINUTES
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateServiceRequest {
    pub workshop_id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: Option<i32>,
}
