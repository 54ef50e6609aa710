use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use uuid::Uuid;

use pitstop_core::{
    errors::BookingError,
    models::vehicle::{CreateVehicleRequest, Vehicle},
};
use pitstop_db::models::DbVehicle;
use pitstop_db::repositories::vehicle;

use crate::{
    ApiState,
    middleware::{auth::ExtractPrincipal, error_handling::AppError},
};

fn vehicle_from_db(v: DbVehicle) -> Vehicle {
    Vehicle {
        id: v.id,
        owner_id: v.owner_id,
        brand: v.brand,
        model: v.model,
        plate: v.plate,
        year: v.year,
        created_at: v.created_at,
    }
}

#[axum::debug_handler]
pub async fn my_vehicles(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
) -> Result<Json<Vec<Vehicle>>, AppError> {
    let vehicles = vehicle::list_vehicles_by_owner(&state.db_pool, principal.id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(vehicle_from_db)
        .collect();

    Ok(Json(vehicles))
}

#[axum::debug_handler]
pub async fn get_vehicle(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<Vehicle>, AppError> {
    let veh = vehicle::get_vehicle_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Vehicle with ID {} not found", id)))?;

    if veh.owner_id != principal.id && !principal.is_staff() {
        return Err(AppError(BookingError::Forbidden(
            "Vehicle does not belong to the caller".to_string(),
        )));
    }

    Ok(Json(vehicle_from_db(veh)))
}

#[axum::debug_handler]
pub async fn add_vehicle(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(payload): Json<CreateVehicleRequest>,
) -> Result<(StatusCode, Json<Vehicle>), AppError> {
    let existing = vehicle::get_vehicle_by_plate(&state.db_pool, &payload.plate)
        .await
        .map_err(BookingError::Database)?;
    if existing.is_some() {
        return Err(AppError(BookingError::Validation(
            "A vehicle with this plate already exists".to_string(),
        )));
    }

    let veh = vehicle::create_vehicle(
        &state.db_pool,
        principal.id,
        &payload.brand,
        &payload.model,
        &payload.plate,
        payload.year,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok((StatusCode::CREATED, Json(vehicle_from_db(veh))))
}

#[axum::debug_handler]
pub async fn delete_vehicle(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<serde_json::Value>, AppError> {
    let veh = vehicle::get_vehicle_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Vehicle with ID {} not found", id)))?;

    if veh.owner_id != principal.id {
        return Err(AppError(BookingError::Forbidden(
            "Vehicle does not belong to the caller".to_string(),
        )));
    }

    vehicle::delete_vehicle(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(serde_json::json!({ "deleted": id })))
}
