use crate::models::{DbShift, DbWorkshop};
use eyre::{Result, eyre};
use pitstop_core::models::workshop::Shift;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

pub async fn create_workshop(
    pool: &Pool<Postgres>,
    name: &str,
    location: &str,
    contact: &str,
) -> Result<DbWorkshop> {
    let id = Uuid::new_v4();

    tracing::debug!("Creating workshop: id={}, name={}", id, name);

    let workshop = sqlx::query_as::<_, DbWorkshop>(
        r#"
        INSERT INTO workshops (id, name, location, contact)
        VALUES ($1, $2, $3, $4)
        RETURNING id, name, location, contact, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(location)
    .bind(contact)
    .fetch_one(pool)
    .await?;

    Ok(workshop)
}

pub async fn get_workshop_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbWorkshop>> {
    tracing::debug!("Getting workshop by id: {}", id);

    let workshop = sqlx::query_as::<_, DbWorkshop>(
        r#"
        SELECT id, name, location, contact, created_at
        FROM workshops
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(workshop)
}

pub async fn list_workshops(pool: &Pool<Postgres>) -> Result<Vec<DbWorkshop>> {
    let workshops = sqlx::query_as::<_, DbWorkshop>(
        r#"
        SELECT id, name, location, contact, created_at
        FROM workshops
        ORDER BY created_at ASC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(workshops)
}

pub async fn update_workshop(
    pool: &Pool<Postgres>,
    id: Uuid,
    name: Option<&str>,
    location: Option<&str>,
    contact: Option<&str>,
) -> Result<DbWorkshop> {
    let workshop = get_workshop_by_id(pool, id)
        .await?
        .ok_or_else(|| eyre!("Workshop not found"))?;

    let name = name.unwrap_or(&workshop.name);
    let location = location.unwrap_or(&workshop.location);
    let contact = contact.unwrap_or(&workshop.contact);

    let updated = sqlx::query_as::<_, DbWorkshop>(
        r#"
        UPDATE workshops
        SET name = $2, location = $3, contact = $4
        WHERE id = $1
        RETURNING id, name, location, contact, created_at
        "#,
    )
    .bind(id)
    .bind(name)
    .bind(location)
    .bind(contact)
    .fetch_one(pool)
    .await?;

    Ok(updated)
}

/// Shifts in catalog order. The scheduler's candidate generation depends on
/// this ordering being stable.
pub async fn get_shifts(pool: &Pool<Postgres>, workshop_id: Uuid) -> Result<Vec<DbShift>> {
    tracing::debug!("Getting shifts for workshop: {}", workshop_id);

    let shifts = sqlx::query_as::<_, DbShift>(
        r#"
        SELECT id, workshop_id, name, start_time, end_time, slots_per_shift, position
        FROM shifts
        WHERE workshop_id = $1
        ORDER BY position ASC, start_time ASC
        "#,
    )
    .bind(workshop_id)
    .fetch_all(pool)
    .await?;

    Ok(shifts)
}

/// Replaces a workshop's shift configuration. Every window is validated
/// (start strictly before end) before anything is written.
pub async fn replace_shifts(
    pool: &Pool<Postgres>,
    workshop_id: Uuid,
    shifts: &[Shift],
) -> Result<Vec<DbShift>> {
    for shift in shifts {
        if !shift.is_valid_window() {
            return Err(eyre!(
                "Shift '{}' has an invalid window: start must be before end",
                shift.name
            ));
        }
    }

    let mut tx = pool.begin().await?;

    sqlx::query(
        r#"
        DELETE FROM shifts
        WHERE workshop_id = $1
        "#,
    )
    .bind(workshop_id)
    .execute(&mut *tx)
    .await?;

    for (position, shift) in shifts.iter().enumerate() {
        sqlx::query(
            r#"
            INSERT INTO shifts (id, workshop_id, name, start_time, end_time, slots_per_shift, position)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(workshop_id)
        .bind(&shift.name)
        .bind(shift.start_time)
        .bind(shift.end_time)
        .bind(shift.slots_per_shift)
        .bind(position as i32)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    get_shifts(pool, workshop_id).await
}
