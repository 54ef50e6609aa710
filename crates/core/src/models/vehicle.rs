use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicleRequest {
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub year: i32,
}
