use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbWorkshop {
    pub id: Uuid,
    pub name: String,
    pub location: String,
    pub contact: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbShift {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub name: String,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub slots_per_shift: i32,
    pub position: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: String,
    pub workshop_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbService {
    pub id: Uuid,
    pub workshop_id: Uuid,
    pub name: String,
    pub price: f64,
    pub duration_minutes: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbVehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbBooking {
    pub id: Uuid,
    pub client_id: Uuid,
    pub vehicle_id: Uuid,
    pub workshop_id: Uuid,
    pub service_id: Uuid,
    pub mechanic_id: Uuid,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: String,
    pub created_at: DateTime<Utc>,
}
