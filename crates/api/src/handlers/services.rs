use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use pitstop_core::{
    errors::BookingError,
    models::service::{CreateServiceRequest, Service},
};
use pitstop_db::models::DbService;
use pitstop_db::repositories::service;

use crate::{
    ApiState,
    middleware::{
        auth::{ExtractPrincipal, require_staff},
        error_handling::AppError,
    },
};

fn service_from_db(s: DbService) -> Service {
    Service {
        id: s.id,
        workshop_id: s.workshop_id,
        name: s.name,
        price: s.price,
        duration_minutes: s.duration_minutes,
    }
}

#[derive(Debug, Deserialize)]
pub struct ListServicesQuery {
    pub workshop_id: Uuid,
}

#[axum::debug_handler]
pub async fn list_services(
    State(state): State<Arc<ApiState>>,
    Query(query): Query<ListServicesQuery>,
) -> Result<Json<Vec<Service>>, AppError> {
    let services = service::list_services_by_workshop(&state.db_pool, query.workshop_id)
        .await
        .map_err(BookingError::Database)?
        .into_iter()
        .map(service_from_db)
        .collect();

    Ok(Json(services))
}

#[axum::debug_handler]
pub async fn get_service(
    State(state): State<Arc<ApiState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<Service>, AppError> {
    let svc = service::get_service_by_id(&state.db_pool, id)
        .await
        .map_err(BookingError::Database)?
        .ok_or_else(|| BookingError::NotFound(format!("Service with ID {} not found", id)))?;

    Ok(Json(service_from_db(svc)))
}

/// Creates a service. Duration defaults to 60 minutes when omitted; the
/// value recorded here sizes every future booking of this service, but
/// never retroactively resizes existing ones.
#[axum::debug_handler]
pub async fn create_service(
    State(state): State<Arc<ApiState>>,
    ExtractPrincipal(principal): ExtractPrincipal,
    Json(payload): Json<CreateServiceRequest>,
) -> Result<(StatusCode, Json<Service>), AppError> {
    require_staff(&principal)?;

    if let Some(d) = payload.duration_minutes {
        if d <= 0 {
            return Err(AppError(BookingError::Validation(
                "Service duration must be positive".to_string(),
            )));
        }
    }

    let svc = service::create_service(
        &state.db_pool,
        payload.workshop_id,
        &payload.name,
        payload.price,
        payload.duration_minutes,
    )
    .await
    .map_err(BookingError::Database)?;

    Ok((StatusCode::CREATED, Json(service_from_db(svc))))
}
