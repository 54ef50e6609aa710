//! # Booking Handlers
//!
//! Slot availability and booking assignment. This is where the scheduling
//! engine in `pitstop-core` meets the ledger in `pitstop-db`.
//!
//! ## Slot Availability
//!
//! `GET /api/bookings/available-slots` combines three read-only inputs:
//!
//! 1. The workshop's shift catalog, expanded into hourly candidate starts
//! 2. The mechanic directory (empty directory means nothing is bookable)
//! 3. The day's non-cancelled bookings
//!
//! A candidate survives when at least one mechanic has no overlapping
//! booking for the service's full duration. The endpoint degrades to an
//! empty list on missing parameters or unconfigured workshops so clients
//! always have a renderable result; only persistence failures surface as
//! errors.
//!
//! ## Booking Assignment
//!
//! `POST /api/bookings` validates ownership and existence up front, then
//! delegates the race-sensitive read-decide-write step to
//! `repositories::booking::reserve_booking`, which serializes concurrent
//! reservations per (workshop, date) inside one transaction. Either exactly
//! one `Pending` row is committed or nothing is written.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use chrono::NaiveDate;
use eyre::eyre;
use serde::Deserialize;
use std::str::FromStr;
use std::sync::Arc;
use uuid::Uuid;

use pitstop_core::{
    errors::BookingError,
    models::booking::{Booking, BookingStatus, CreateBookingRequest, UpdateBookingStatusRequest},
    schedule::{self, DEFAULT_DURATION_MINUTES},
};
use pitstop_db::models::DbBooking;
use pitstop_db::repositories::{booking, service, user, vehicle, workshop};

use crate::{
    ApiState,
    middleware::{
        auth::{ExtractPrincipal, require_staff},
        error_handling::AppError,
    },
};

/// Query parameters for the available-slots endpoint. All optional: a
/// request missing the required ones gets an empty list, not an error.
#[derive(Debug, Deserialize)]
pub struct AvailableSlotsQuery {
    pub workshop_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub service_id: Option<Uuid>,
}

fn booking_from_db(b: DbBooking) -> Result<Booking, AppError> {
    let status = BookingStatus::from_str(&b.status)
        .map_err(|e| BookingError::Database(eyre!("corrupt status in ledger: {e}")))?;
    Ok(Booking {
        id: b.id,
        client_id: b.client_id,
        vehicle_id: b.vehicle_id,
        workshop_id: b.workshop_id,
        service_id: b.service_id,
        mechanic_id: b.mechanic_id,
        date: b.date,
        start_time: b.start_time,
        end_time: b.end_time,
        status,
        created_at: b.created_at,
    })
}

async fn resolve_duration(
    state: &ApiState,
    service_id: Option<Uuid>,
) -> Result<i64, AppError> {
    let Some(service_id) = service_id else {
        return Ok(DEFAULT_DURATION_MINUTES);
    };
    let duration = service::get_service_by_id(&state.db_pool, service_id)
        .await
        .map_err(BookingError::Database)?
        .map(|s| i64::from(s.duration_minutes))
        .filter(|&d| d > 0)
        .unwrap_or(DEFAULT_DURATION_MINUTES);
    Ok(duration)
}

/// Lists bookable start times for a workshop/date, sized by the service's
/// duration. Responds `200 []` on any missing-data condition.
#[axum::debug_handler]
pub async fn available_slots(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<Vec<String>>, AppError> {
    let (Some(workshop_id), Some(date)) = (query.workshop_id, query.date) else {
        return Ok(Json(Vec::new()));
    };

    let duration = resolve_duration(&state, query.service_id).await?;

    let shifts = workshop::get_shifts(&state.db_pool, workshop_id)
        .await
        .map_err(BookingError::Database)?;
    if shifts.is_empty() {
        return Ok(Json(Vec::new()));
    }
    let shifts: Vec<_> = shifts
        .into_iter()
        .map(|s| pitstop_core::models::workshop::Shift {
            name: s.name,
            start_time: s.start_time,
            end_time: s.end_time,
            slots_per_shift: s.slots_per_shift,
        })
        .collect();

    let mechanics: Vec<Uuid> = user::get_mechanics(&state.db_pool, workshop_id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let occupied: Vec<schedule::OccupiedInterval> =
        booking::get_bookings_for_day(&state.db_pool, workshop_id, date)
            .await
            .map_err(BookingError::Database)?
            .into_iter()
            .map(|b| schedule::OccupiedInterval {
                mechanic_id: b.mechanic_id,
                start_time: b.start_time,
                end_time: b.end_time,
            })
            .collect();

    let slots = schedule::available_slots(&shifts, &mechanics, &occupied, duration)
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect();

    Ok(Json(slots))
}

/// Creates a booking, assigning the first free mechanic for the requested
/// interval. Validation order: vehicle existence/ownership, service
/// existence, mechanic availability.
#[axum::debug_handler]
pub async fn create_booking(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<(StatusCode, Json<Booking>), AppError> {
    let veh = vehicle::get_vehicle_by_id(&state.db_pool, payload.vehicle_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound("Vehicle not found".to_string()))?;
    if veh.owner_id != principal.id {
        return Err(AppError(BookingError::Forbidden(
            "Vehicle does not belong to the caller".to_string(),
        )));
    }

    let svc = service::get_service_by_id(&state.db_pool, payload.service_id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound("Service not found".to_string()))?;

    let duration = if svc.duration_minutes > 0 {
        i64::from(svc.duration_minutes)
    } else {
        DEFAULT_DURATION_MINUTES
    };
    let end_time = schedule::add_minutes(payload.time, duration);

    let mechanics: Vec<Uuid> = user::get_mechanics(&state.db_pool, payload.workshop_id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(|m| m.id)
        .collect();
    if mechanics.is_empty() {
        return Err(AppError(BookingError::NoCapacity(
            "No mechanics available".to_string(),
        )));
    }

    let reserved = booking::reserve_booking(
        &state.db_pool,
        principal.id,
        payload.vehicle_id,
        payload.workshop_id,
        payload.service_id,
        &mechanics,
        payload.date,
        payload.time,
        end_time,
    )
    .await
    .map_err(BookingError::Database)?
    .ok_or_else(|| {
        BookingError::NoCapacity(format!(
            "No mechanic free for {} minutes starting at {}",
            duration,
            payload.time.format("%H:%M")
        ))
    })?;

    Ok((StatusCode::CREATED, Json(booking_from_db(reserved)?)))
}

/// Advances a booking through its state machine. Staff only; target labels
/// outside the recognized vocabulary and backward transitions are rejected.
#[axum::debug_handler]
pub async fn update_booking_status(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBookingStatusRequest>,
) -> Result<Json<Booking>, AppError> {
    require_staff(&principal)?;

    let target = BookingStatus::from_str(&payload.status)
        .map_err(|_| BookingError::InvalidStatus(payload.status.clone()))?;

    let current = booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;
    let current = booking_from_db(current)?;

    if !current.status.can_transition_to(target) {
        return Err(AppError(BookingError::InvalidStatus(format!(
            "cannot move from {} to {}",
            current.status, target
        ))));
    }

    let updated = booking::update_status(&state.db_pool, id, target)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(booking_from_db(updated)?))
}

/// Cancels the caller's own booking. A cancelled booking keeps its row but
/// stops occupying its mechanic's time.
#[axum::debug_handler]
pub async fn cancel_booking(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Path(id): Path<Uuid>,
) -> Result<Json<Booking>, AppError> {
    let current = booking::get_booking_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Booking with ID {} not found", id)))?;
    let current = booking_from_db(current)?;

    if current.client_id != principal.id && !principal.is_staff() {
        return Err(AppError(BookingError::Forbidden(
            "Booking does not belong to the caller".to_string(),
        )));
    }

    if !current.status.can_transition_to(BookingStatus::Cancelled) {
        return Err(AppError(BookingError::InvalidStatus(format!(
            "cannot cancel a booking that is {}",
            current.status
        ))));
    }

    let updated = booking::update_status(&state.db_pool, id, BookingStatus::Cancelled)
        .await
        .map_err(BookingError::Database)?;

    Ok(Json(booking_from_db(updated)?))
}

/// The caller's booking history, newest first.
#[axum::debug_handler]
pub async fn my_bookings(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
) -> Result<Json<Vec<Booking>>, AppError> {
    let bookings = booking::list_bookings_by_client(&state.db_pool, principal.id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(booking_from_db)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(bookings))
}

/// All bookings across the chain, staff only.
#[axum::debug_handler]
pub async fn list_all_bookings(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
) -> Result<Json<Vec<Booking>>, AppError> {
    require_staff(&principal)?;

    let bookings = booking::list_all_bookings(&state.db_pool)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(booking_from_db)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Json(bookings))
}
