use axum::{
    Router,
    routing::{get, patch, post, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/bookings/available-slots",
            get(handlers::bookings::available_slots),
        )
        .route(
            "/api/bookings",
            post(handlers::bookings::create_booking).get(handlers::bookings::list_all_bookings),
        )
        .route(
            "/api/bookings/my-bookings",
            get(handlers::bookings::my_bookings),
        )
        .route(
            "/api/bookings/:id/status",
            patch(handlers::bookings::update_booking_status),
        )
        .route(
            "/api/bookings/:id/cancel",
            put(handlers::bookings::cancel_booking),
        )
}
