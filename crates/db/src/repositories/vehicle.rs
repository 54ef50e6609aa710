use crate::models::DbVehicle;
use eyre::Result;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_vehicle(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
    brand: &str,
    model: &str,
    plate: &str,
    year: i32,
) -> Result<DbVehicle> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating vehicle: id={}, plate={}", id, plate);

    let vehicle = sqlx::query_as::<_, DbVehicle>(
        r#"
        INSERT INTO vehicles (id, owner_id, brand, model, plate, year)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING id, owner_id, brand, model, plate, year, created_at
        "#,
    )
    .bind(id)
    .bind(owner_id)
    .bind(brand)
    .bind(model)
    .bind(plate)
    .bind(year)
    .fetch_one(pool)
    .await?;

    Ok(vehicle)
}

pub async fn get_vehicle_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbVehicle>> {
    tracing::debug!("Getting vehicle by id: {}", id);

    let vehicle = sqlx::query_as::<_, DbVehicle>(
        r#"
        SELECT id, owner_id, brand, model, plate, year, created_at
        FROM vehicles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(vehicle)
}

pub async fn get_vehicle_by_plate(pool: &Pool<Postgres>, plate: &str) -> Result<Option<DbVehicle>> {
    let vehicle = sqlx::query_as::<_, DbVehicle>(
        r#"
        SELECT id, owner_id, brand, model, plate, year, created_at
        FROM vehicles
        WHERE plate = $1
        "#,
    )
    .bind(plate)
    .fetch_optional(pool)
    .await?;

    Ok(vehicle)
}

pub async fn list_vehicles_by_owner(
    pool: &Pool<Postgres>,
    owner_id: Uuid,
) -> Result<Vec<DbVehicle>> {
    let vehicles = sqlx::query_as::<_, DbVehicle>(
        r#"
        SELECT id, owner_id, brand, model, plate, year, created_at
        FROM vehicles
        WHERE owner_id = $1
        ORDER BY created_at ASC
        "#,
    )
    .bind(owner_id)
    .fetch_all(pool)
    .await?;

    Ok(vehicles)
}

pub async fn delete_vehicle(pool: &Pool<Postgres>, id: Uuid) -> Result<()> {
    sqlx::query(
        r#"
        DELETE FROM vehicles
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}
