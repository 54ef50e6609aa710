use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::serde_fmt::hhmm;

/// Lifecycle of a booking. Transitions only move forward:
///
/// ```text
/// Pending -> Confirmed -> InProgress -> Completed
///    \            \
///     `-> Cancelled`-> Cancelled
/// ```
///
/// `Completed` and `Cancelled` are terminal. Bookings are never deleted;
/// cancellation is a transition, preserving history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookingStatus {
    Pending,
    Confirmed,
    #[serde(rename = "In Progress")]
    InProgress,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Pending => "Pending",
            BookingStatus::Confirmed => "Confirmed",
            BookingStatus::InProgress => "In Progress",
            BookingStatus::Completed => "Completed",
            BookingStatus::Cancelled => "Cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BookingStatus::Completed | BookingStatus::Cancelled)
    }

    /// Whether the booking occupies its mechanic's time. Only cancelled
    /// bookings release their interval.
    pub fn occupies_slot(&self) -> bool {
        !matches!(self, BookingStatus::Cancelled)
    }

    /// Legal forward transitions of the state machine.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Confirmed, InProgress)
                | (InProgress, Completed)
                | (Pending, Cancelled)
                | (Confirmed, Cancelled)
        )
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(BookingStatus::Pending),
            "Confirmed" => Ok(BookingStatus::Confirmed),
            "In Progress" => Ok(BookingStatus::InProgress),
            "Completed" => Ok(BookingStatus::Completed),
            "Cancelled" => Ok(BookingStatus::Cancelled),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// One appointment in the booking ledger. `end_time` is stored at creation
/// time from the service duration in force then; it is never recomputed, so
/// later edits to the service cannot corrupt overlap checks against history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub workshop_id: Uuid,
    pub service_id: Uuid,
    pub mechanic_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub start_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookingRequest {
    pub workshop_id: Uuid,
    pub service_id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    pub status: String,
}
