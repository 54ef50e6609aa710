use axum::{
    Router,
    routing::get,
};
use std::sync::Arc;

use crate::{ApiState, handlers};

pub fn routes() -> Router<Arc<ApiState>> {
    Router::new()
        .route(
            "/api/vehicles",
            get(handlers::vehicles::my_vehicles).post(handlers::vehicles::add_vehicle),
        )
        .route(
            "/api/vehicles/:id",
            get(handlers::vehicles::get_vehicle).delete(handlers::vehicles::delete_vehicle),
        )
}
