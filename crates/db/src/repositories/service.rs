use crate::models::DbService;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_service(
    pool: &Pool<Postgres>,
    workshop_id: Uuid,
    name: &str,
    price: f64,
    duration_minutes: Option<i32>,
) -> Result<DbService> {
    let id = Uuid::new_v4();
    let duration = duration_minutes.unwrap_or(60);

    tracing::debug!(
        "Creating service: id={}, name={}, duration={}min",
        id,
        name,
        duration
    );

    let service = sqlx::query_as::<_, DbService>(
        r#"
        INSERT INTO services (id, workshop_id, name, price, duration_minutes)
        VALUES ($1, $2, $3, $4, $5)
        RETURNING id, workshop_id, name, price, duration_minutes, created_at
        "#,
    )
    .bind(id)
    .bind(workshop_id)
    .bind(name)
    .bind(price)
    .bind(duration)
    .fetch_one(pool)
    .await?;

    Ok(service)
}

pub async fn get_service_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbService>> {
    tracing::debug!("Getting service by id: {}", id);

    let service = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, workshop_id, name, price, duration_minutes, created_at
        FROM services
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(service)
}

pub async fn list_services_by_workshop(
    pool: &Pool<Postgres>,
    workshop_id: Uuid,
) -> Result<Vec<DbService>> {
    let services = sqlx::query_as::<_, DbService>(
        r#"
        SELECT id, workshop_id, name, price, duration_minutes, created_at
        FROM services
        WHERE workshop_id = $1
        ORDER BY name ASC
        "#,
    )
    .bind(workshop_id)
    .fetch_all(pool)
    .await?;

    Ok(services)
}
