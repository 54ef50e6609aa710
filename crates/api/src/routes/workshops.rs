use axum::{
    Router,
    routing::{get, put},
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route("/api/workshops", get(handlers::workshops::list_workshops))
        .route(
            "/api/workshops/:id",
            get(handlers::workshops::workshop_details).put(handlers::workshops::update_workshop),
        )
        .route(
            "/api/workshops/:id/shifts",
            put(handlers::workshops::update_shifts),
        )
}
