use axum::{
    Json,
    extract::{Path, State},
};
use std::sync::Arc;
use uuid::Uuid;

use pitstop_core::{
    errors::BookingError,
    models::{
        service::Service,
        workshop::{Shift, UpdateShiftsRequest, UpdateWorkshopRequest, Workshop, WorkshopDetailsResponse},
    },
};
use pitstop_db::models::{DbService, DbShift, DbWorkshop};
use pitstop_db::repositories::{service, workshop};

use crate::{
    ApiState,
    middleware::{
        auth::{ExtractPrincipal, require_staff},
        error_handling::AppError,
    },
};

fn workshop_from_db(w: DbWorkshop) -> Workshop {
    Workshop {
        id: w.id,
        name: w.name,
        location: w.location,
        contact: w.contact,
        created_at: w.created_at,
    }
}

fn shift_from_db(s: DbShift) -> Shift {
    Shift {
        name: s.name,
        start_time: s.start_time,
        end_time: s.end_time,
        slots_per_shift: s.slots_per_shift,
    }
}

fn service_from_db(s: DbService) -> Service {
    Service {
        id: s.id,
        workshop_id: s.workshop_id,
        name: s.name,
        price: s.price,
        duration_minutes: s.duration_minutes,
    }
}

#[axum::debug_handler]
pub async fn list_workshops(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<Vec<Workshop>>, AppError> {
    let workshops = workshop::list_workshops(&state.db_pool)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(workshop_from_db)
        .collect();

    Ok(Json(workshops))
}

#[axum::debug_handler]
pub async fn workshop_details(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<WorkshopDetailsResponse>, AppError> {
    let ws = workshop::get_workshop_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Workshop with ID {} not found", id)))?;

    let shifts = workshop::get_shifts(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(shift_from_db)
        .collect();

    let services = service::list_services_by_workshop(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(service_from_db)
        .collect();

    Ok(Json(WorkshopDetailsResponse {
        workshop: workshop_from_db(ws),
        shifts,
        services,
    }))
}

#[axum::debug_handler]
pub async fn update_workshop(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateWorkshopRequest>,
) -> Result<Json<Workshop>, AppError> {
    require_staff(&principal)?;

    let updated = workshop::update_workshop(
        &state.db_pool,
        id,
        payload.name.as_deref(),
        payload.location.as_deref(),
        payload.contact.as_deref(),
    )
    .await
    .map_err(BookingError::Database)?;

    Ok(Json(workshop_from_db(updated)))
}

/// Replaces a workshop's shift configuration. Windows where start is not
/// strictly before end are rejected before anything is written.
#[axum::debug_handler]
pub async fn update_shifts(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateShiftsRequest>,
) -> Result<Json<Vec<Shift>>, AppError> {
    require_staff(&principal)?;

    workshop::get_workshop_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Workshop with ID {} not found", id)))?;

    if let Some(bad) = payload.shifts.iter().find(|s| !s.is_valid_window()) {
        return Err(AppError(BookingError::Validation(format!(
            "Shift '{}' must start before it ends",
            bad.name
        ))));
    }

    let shifts = workshop::replace_shifts(&state.db_pool, id, &payload.shifts)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(shift_from_db)
        .collect();

    Ok(Json(shifts))
}
