use crate::models::DbBooking;
use chrono::{NaiveDate, NaiveTime};
use eyre::Result;
use pitstop_core::models::booking::BookingStatus;
use pitstop_core::schedule;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

/// Non-cancelled bookings for one workshop and day, the scheduler's working
/// set for every availability and assignment decision.
pub async fn get_bookings_for_day(
    pool: &Pool<Postgres>,
    workshop_id: Uuid,
    date: NaiveDate,
) -> Result<Vec<DbBooking>> {
    tracing::debug!("Getting bookings for workshop {} on {}", workshop_id, date);

    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
               date, start_time, end_time, status, created_at
        FROM bookings
        WHERE workshop_id = $1 AND date = $2 AND status <> 'Cancelled'
        ORDER BY start_time ASC
        "#,
    )
    .bind(workshop_id)
    .bind(date)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn get_booking_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<DbBooking>> {
    tracing::debug!("Getting booking by id: {}", id);

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
               date, start_time, end_time, status, created_at
        FROM bookings
        WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(booking)
}

pub async fn list_bookings_by_client(
    pool: &Pool<Postgres>,
    client_id: Uuid,
) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
               date, start_time, end_time, status, created_at
        FROM bookings
        WHERE client_id = $1
        ORDER BY date DESC, start_time DESC
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn list_all_bookings(pool: &Pool<Postgres>) -> Result<Vec<DbBooking>> {
    let bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
               date, start_time, end_time, status, created_at
        FROM bookings
        ORDER BY date DESC, start_time DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

pub async fn update_status(
    pool: &Pool<Postgres>,
    id: Uuid,
    status: BookingStatus,
) -> Result<DbBooking> {
    tracing::debug!("Updating booking {} status to {}", id, status);

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        UPDATE bookings
        SET status = $2
        WHERE id = $1
        RETURNING id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
                  date, start_time, end_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(status.as_str())
    .fetch_one(pool)
    .await?;

    Ok(booking)
}

/// Atomically assigns a free mechanic and commits a new `Pending` booking.
///
/// Reading the day's ledger, picking a mechanic, and inserting the row all
/// happen inside one transaction that holds an advisory lock keyed on
/// (workshop, date). Two racing requests for the same workshop day
/// serialize here, so the loser re-reads a ledger that already contains the
/// winner's row and cannot double-book a mechanic.
///
/// `mechanics` is the caller-fetched directory in its deterministic order;
/// the first entry without an overlapping non-cancelled booking wins.
/// Returns `Ok(None)` when every mechanic is busy for the interval. Nothing
/// is written in that case.
pub async fn reserve_booking(
    pool: &Pool<Postgres>,
    client_id: Uuid,
    vehicle_id: Uuid,
    workshop_id: Uuid,
    service_id: Uuid,
    mechanics: &[Uuid],
    date: NaiveDate,
    start_time: NaiveTime,
    end_time: NaiveTime,
) -> Result<Option<DbBooking>> {
    let mut tx = pool.begin().await?;

    // Serialize racing reservations for the same workshop and day. The lock
    // is released automatically at commit or rollback.
    sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1), hashtext($2))")
        .bind(workshop_id.to_string())
        .bind(date.to_string())
        .execute(&mut *tx)
        .await?;

    let day_bookings = sqlx::query_as::<_, DbBooking>(
        r#"
        SELECT id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
               date, start_time, end_time, status, created_at
        FROM bookings
        WHERE workshop_id = $1 AND date = $2 AND status <> 'Cancelled'
        "#,
    )
    .bind(workshop_id)
    .bind(date)
    .fetch_all(&mut *tx)
    .await?;

    let occupied: Vec<schedule::OccupiedInterval> = day_bookings
        .iter()
        .map(|b| schedule::OccupiedInterval {
            mechanic_id: b.mechanic_id,
            start_time: b.start_time,
            end_time: b.end_time,
        })
        .collect();

    let busy = schedule::busy_mechanics(&occupied, start_time, end_time);
    let Some(mechanic_id) = schedule::first_free_mechanic(mechanics, &busy) else {
        tx.rollback().await?;
        return Ok(None);
    };

    let id = Uuid::new_v4();
    tracing::debug!(
        "Reserving booking: id={}, mechanic={}, {} {}..{}",
        id,
        mechanic_id,
        date,
        start_time.format("%H:%M"),
        end_time.format("%H:%M")
    );

    let booking = sqlx::query_as::<_, DbBooking>(
        r#"
        INSERT INTO bookings (id, client_id, vehicle_id, workshop_id, service_id,
                              mechanic_id, date, start_time, end_time, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, 'Pending')
        RETURNING id, client_id, vehicle_id, workshop_id, service_id, mechanic_id,
                  date, start_time, end_time, status, created_at
        "#,
    )
    .bind(id)
    .bind(client_id)
    .bind(vehicle_id)
    .bind(workshop_id)
    .bind(service_id)
    .bind(mechanic_id)
    .bind(date)
    .bind(start_time)
    .bind(end_time)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(Some(booking))
}
