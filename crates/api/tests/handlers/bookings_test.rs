use chrono::{NaiveDate, NaiveTime, Utc};
use mockall::predicate;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use pitstop_core::errors::BookingError;
use pitstop_core::models::booking::BookingStatus;
use pitstop_core::models::user::{Principal, Role};
use pitstop_core::schedule::{self, DEFAULT_DURATION_MINUTES};
use pitstop_db::models::{DbBooking, DbService, DbShift, DbUser, DbVehicle};

use crate::test_utils::TestContext;
use pitstop_api::middleware::error_handling::AppError;

fn t(h: u32, m: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(h, m, 0).unwrap()
}

fn date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 9, 1).unwrap()
}

fn client() -> Principal {
    Principal {
        id: Uuid::new_v4(),
        role: Role::Client,
    }
}

fn db_vehicle(owner_id: Uuid) -> DbVehicle {
    DbVehicle {
        id: Uuid::new_v4(),
        owner_id,
        brand: "Toyota".to_string(),
        model: "Corolla".to_string(),
        plate: "AA-01-BB".to_string(),
        year: 2019,
        created_at: Utc::now(),
    }
}

fn db_service(workshop_id: Uuid, duration: i32) -> DbService {
    DbService {
        id: Uuid::new_v4(),
        workshop_id,
        name: "Oil Change".to_string(),
        price: 49.9,
        duration_minutes: duration,
        created_at: Utc::now(),
    }
}

fn db_mechanic(id: Uuid, workshop_id: Uuid) -> DbUser {
    DbUser {
        id,
        name: "Mechanic".to_string(),
        email: format!("{id}@garage.local"),
        role: "mechanic".to_string(),
        workshop_id: Some(workshop_id),
        created_at: Utc::now(),
    }
}

fn db_shift(workshop_id: Uuid, start: NaiveTime, end: NaiveTime) -> DbShift {
    DbShift {
        id: Uuid::new_v4(),
        workshop_id,
        name: "Morning".to_string(),
        start_time: start,
        end_time: end,
        slots_per_shift: 2,
        position: 0,
    }
}

/// The request payload the booking flow operates on.
struct BookingAttempt {
    workshop_id: Uuid,
    service_id: Uuid,
    vehicle_id: Uuid,
    date: NaiveDate,
    time: NaiveTime,
}

/// Drives the create-booking validation sequence against the mocked
/// repositories, mirroring the handler's ordering: vehicle existence and
/// ownership, service existence, mechanic directory, reservation.
async fn create_booking_flow(
    ctx: &TestContext,
    principal: Principal,
    attempt: BookingAttempt,
) -> Result<DbBooking, AppError> {
    let vehicle = ctx
        .vehicle_repo
        .get_vehicle_by_id(attempt.vehicle_id)
        .await?
        .ok_or_else(|| AppError(BookingError::NotFound("Vehicle not found".to_string())))?;
    if vehicle.owner_id != principal.id {
        return Err(AppError(BookingError::Forbidden(
            "Vehicle does not belong to the caller".to_string(),
        )));
    }

    let service = ctx
        .service_repo
        .get_service_by_id(attempt.service_id)
        .await?
        .ok_or_else(|| AppError(BookingError::NotFound("Service not found".to_string())))?;

    let duration = if service.duration_minutes > 0 {
        i64::from(service.duration_minutes)
    } else {
        DEFAULT_DURATION_MINUTES
    };
    let end_time = schedule::add_minutes(attempt.time, duration);

    let mechanics: Vec<Uuid> = ctx
        .user_repo
        .get_mechanics(attempt.workshop_id)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();
    if mechanics.is_empty() {
        return Err(AppError(BookingError::NoCapacity(
            "No mechanics available".to_string(),
        )));
    }

    ctx.booking_repo
        .reserve_booking(
            principal.id,
            attempt.vehicle_id,
            attempt.workshop_id,
            attempt.service_id,
            mechanics,
            attempt.date,
            attempt.time,
            end_time,
        )
        .await?
        .ok_or_else(|| {
            AppError(BookingError::NoCapacity(format!(
                "No mechanic free for {} minutes starting at {}",
                duration,
                attempt.time.format("%H:%M")
            )))
        })
}

fn attempt_at(time: NaiveTime) -> BookingAttempt {
    BookingAttempt {
        workshop_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        date: date(),
        time,
    }
}

#[tokio::test]
async fn missing_vehicle_is_not_found() {
    let mut ctx = TestContext::new();
    let attempt = attempt_at(t(9, 0));

    ctx.vehicle_repo
        .expect_get_vehicle_by_id()
        .with(predicate::eq(attempt.vehicle_id))
        .returning(|_| Ok(None));

    let result = create_booking_flow(&ctx, client(), attempt).await;
    assert!(matches!(result, Err(AppError(BookingError::NotFound(_)))));
}

#[tokio::test]
async fn foreign_vehicle_is_forbidden() {
    let mut ctx = TestContext::new();
    let attempt = attempt_at(t(9, 0));
    let someone_else = Uuid::new_v4();

    ctx.vehicle_repo
        .expect_get_vehicle_by_id()
        .returning(move |_| Ok(Some(db_vehicle(someone_else))));

    let result = create_booking_flow(&ctx, client(), attempt).await;
    assert!(matches!(result, Err(AppError(BookingError::Forbidden(_)))));
}

#[tokio::test]
async fn missing_service_is_not_found() {
    let mut ctx = TestContext::new();
    let principal = client();
    let attempt = attempt_at(t(9, 0));
    let owner = principal.id;

    ctx.vehicle_repo
        .expect_get_vehicle_by_id()
        .returning(move |_| Ok(Some(db_vehicle(owner))));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(|_| Ok(None));

    let result = create_booking_flow(&ctx, principal, attempt).await;
    assert!(matches!(result, Err(AppError(BookingError::NotFound(_)))));
}

#[tokio::test]
async fn empty_mechanic_directory_is_no_capacity() {
    let mut ctx = TestContext::new();
    let principal = client();
    let attempt = attempt_at(t(9, 0));
    let owner = principal.id;
    let workshop_id = attempt.workshop_id;

    ctx.vehicle_repo
        .expect_get_vehicle_by_id()
        .returning(move |_| Ok(Some(db_vehicle(owner))));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(db_service(workshop_id, 60))));
    ctx.user_repo
        .expect_get_mechanics()
        .returning(|_| Ok(Vec::new()));

    let result = create_booking_flow(&ctx, principal, attempt).await;
    assert!(matches!(result, Err(AppError(BookingError::NoCapacity(_)))));
}

#[tokio::test]
async fn full_interval_is_no_capacity_with_duration_in_message() {
    let mut ctx = TestContext::new();
    let principal = client();
    let attempt = attempt_at(t(9, 0));
    let owner = principal.id;
    let workshop_id = attempt.workshop_id;
    let mechanic_id = Uuid::new_v4();

    ctx.vehicle_repo
        .expect_get_vehicle_by_id()
        .returning(move |_| Ok(Some(db_vehicle(owner))));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(db_service(workshop_id, 90))));
    ctx.user_repo
        .expect_get_mechanics()
        .returning(move |_| Ok(vec![db_mechanic(mechanic_id, workshop_id)]));
    // Reservation finds every mechanic busy.
    ctx.booking_repo
        .expect_reserve_booking()
        .returning(|_, _, _, _, _, _, _, _| Ok(None));

    let result = create_booking_flow(&ctx, principal, attempt).await;
    match result {
        Err(AppError(BookingError::NoCapacity(msg))) => {
            assert!(msg.contains("90"), "message names the duration: {msg}");
            assert!(msg.contains("09:00"), "message names the time: {msg}");
        }
        other => panic!("expected NoCapacity, got {other:?}"),
    }
}

#[tokio::test]
async fn successful_booking_is_pending_with_stored_end_time() {
    let mut ctx = TestContext::new();
    let principal = client();
    let attempt = attempt_at(t(9, 30));
    let owner = principal.id;
    let workshop_id = attempt.workshop_id;
    let vehicle_id = attempt.vehicle_id;
    let service_id = attempt.service_id;
    let mechanic_id = Uuid::new_v4();

    ctx.vehicle_repo
        .expect_get_vehicle_by_id()
        .returning(move |_| Ok(Some(db_vehicle(owner))));
    ctx.service_repo
        .expect_get_service_by_id()
        .returning(move |_| Ok(Some(db_service(workshop_id, 90))));
    ctx.user_repo
        .expect_get_mechanics()
        .returning(move |_| Ok(vec![db_mechanic(mechanic_id, workshop_id)]));
    ctx.booking_repo.expect_reserve_booking().returning(
        move |client_id, vehicle_id, workshop_id, service_id, mechanics, date, start, end| {
            Ok(Some(DbBooking {
                id: Uuid::new_v4(),
                client_id,
                vehicle_id,
                workshop_id,
                service_id,
                mechanic_id: mechanics[0],
                date,
                start_time: start,
                end_time: end,
                status: BookingStatus::Pending.as_str().to_string(),
                created_at: Utc::now(),
            }))
        },
    );

    let booking = create_booking_flow(&ctx, principal, attempt)
        .await
        .expect("booking should commit");

    assert_eq!(booking.client_id, owner);
    assert_eq!(booking.vehicle_id, vehicle_id);
    assert_eq!(booking.service_id, service_id);
    assert_eq!(booking.mechanic_id, mechanic_id);
    assert_eq!(booking.start_time, t(9, 30));
    // 90-minute service starting 09:30 is stored ending at 11:00.
    assert_eq!(booking.end_time, t(11, 0));
    assert_eq!(booking.status, "Pending");
}

/// Drives the available-slots read path against the mocks: shifts expand to
/// hourly candidates, the ledger's busy intervals filter them.
async fn available_slots_flow(
    ctx: &TestContext,
    workshop_id: Option<Uuid>,
    date: Option<NaiveDate>,
    duration: i64,
) -> Result<Vec<String>, AppError> {
    let (Some(workshop_id), Some(date)) = (workshop_id, date) else {
        return Ok(Vec::new());
    };

    let shifts: Vec<_> = ctx
        .workshop_repo
        .get_shifts(workshop_id)
        .await?
        .into_iter()
        .map(|s| pitstop_core::models::workshop::Shift {
            name: s.name,
            start_time: s.start_time,
            end_time: s.end_time,
            slots_per_shift: s.slots_per_shift,
        })
        .collect();
    if shifts.is_empty() {
        return Ok(Vec::new());
    }

    let mechanics: Vec<Uuid> = ctx
        .user_repo
        .get_mechanics(workshop_id)
        .await?
        .into_iter()
        .map(|m| m.id)
        .collect();

    let occupied: Vec<schedule::OccupiedInterval> = ctx
        .booking_repo
        .get_bookings_for_day(workshop_id, date)
        .await?
        .into_iter()
        .map(|b| schedule::OccupiedInterval {
            mechanic_id: b.mechanic_id,
            start_time: b.start_time,
            end_time: b.end_time,
        })
        .collect();

    Ok(schedule::available_slots(&shifts, &mechanics, &occupied, duration)
        .into_iter()
        .map(|t| t.format("%H:%M").to_string())
        .collect())
}

#[tokio::test]
async fn missing_parameters_yield_empty_list() {
    let ctx = TestContext::new();

    let slots = available_slots_flow(&ctx, None, Some(date()), 60)
        .await
        .unwrap();
    assert!(slots.is_empty());

    let slots = available_slots_flow(&ctx, Some(Uuid::new_v4()), None, 60)
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn unconfigured_workshop_yields_empty_list() {
    let mut ctx = TestContext::new();
    ctx.workshop_repo
        .expect_get_shifts()
        .returning(|_| Ok(Vec::new()));

    let slots = available_slots_flow(&ctx, Some(Uuid::new_v4()), Some(date()), 60)
        .await
        .unwrap();
    assert!(slots.is_empty());
}

#[tokio::test]
async fn booked_hour_disappears_from_availability() {
    let mut ctx = TestContext::new();
    let workshop_id = Uuid::new_v4();
    let mechanic_id = Uuid::new_v4();

    ctx.workshop_repo
        .expect_get_shifts()
        .returning(move |ws| Ok(vec![db_shift(ws, t(9, 0), t(11, 0))]));
    ctx.user_repo
        .expect_get_mechanics()
        .returning(move |ws| Ok(vec![db_mechanic(mechanic_id, ws)]));

    // Empty ledger: both hours bookable.
    ctx.booking_repo
        .expect_get_bookings_for_day()
        .times(1)
        .returning(|_, _| Ok(Vec::new()));
    let slots = available_slots_flow(&ctx, Some(workshop_id), Some(date()), 60)
        .await
        .unwrap();
    assert_eq!(slots, vec!["09:00".to_string(), "10:00".to_string()]);

    // After a 09:00 booking only 10:00 survives.
    ctx.booking_repo
        .expect_get_bookings_for_day()
        .returning(move |ws, d| {
            Ok(vec![DbBooking {
                id: Uuid::new_v4(),
                client_id: Uuid::new_v4(),
                vehicle_id: Uuid::new_v4(),
                workshop_id: ws,
                service_id: Uuid::new_v4(),
                mechanic_id,
                date: d,
                start_time: t(9, 0),
                end_time: t(10, 0),
                status: "Pending".to_string(),
                created_at: Utc::now(),
            }])
        });
    let slots = available_slots_flow(&ctx, Some(workshop_id), Some(date()), 60)
        .await
        .unwrap();
    assert_eq!(slots, vec!["10:00".to_string()]);
}

/// Mirrors the status-transition handler: parse the label, check the state
/// machine, persist.
async fn update_status_flow(
    ctx: &TestContext,
    id: Uuid,
    label: &str,
) -> Result<DbBooking, AppError> {
    use std::str::FromStr;

    let target = BookingStatus::from_str(label)
        .map_err(|_| AppError(BookingError::InvalidStatus(label.to_string())))?;

    let current = ctx
        .booking_repo
        .get_booking_by_id(id)
        .await?
        .ok_or_else(|| AppError(BookingError::NotFound("Booking not found".to_string())))?;
    let current_status = BookingStatus::from_str(&current.status)
        .map_err(|e| AppError(BookingError::Database(eyre::eyre!(e))))?;

    if !current_status.can_transition_to(target) {
        return Err(AppError(BookingError::InvalidStatus(format!(
            "cannot move from {current_status} to {target}"
        ))));
    }

    Ok(ctx.booking_repo.update_status(id, target).await?)
}

fn pending_booking(id: Uuid, status: &str) -> DbBooking {
    DbBooking {
        id,
        client_id: Uuid::new_v4(),
        vehicle_id: Uuid::new_v4(),
        workshop_id: Uuid::new_v4(),
        service_id: Uuid::new_v4(),
        mechanic_id: Uuid::new_v4(),
        date: date(),
        start_time: t(9, 0),
        end_time: t(10, 0),
        status: status.to_string(),
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn unknown_status_label_is_rejected() {
    let ctx = TestContext::new();

    let result = update_status_flow(&ctx, Uuid::new_v4(), "Paused").await;
    assert!(matches!(
        result,
        Err(AppError(BookingError::InvalidStatus(_)))
    ));
}

#[tokio::test]
async fn backward_transition_is_rejected() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |id| Ok(Some(pending_booking(id, "Completed"))));

    let result = update_status_flow(&ctx, id, "Pending").await;
    assert!(matches!(
        result,
        Err(AppError(BookingError::InvalidStatus(_)))
    ));
}

#[tokio::test]
async fn legal_transition_is_persisted() {
    let mut ctx = TestContext::new();
    let id = Uuid::new_v4();

    ctx.booking_repo
        .expect_get_booking_by_id()
        .returning(move |id| Ok(Some(pending_booking(id, "Pending"))));
    ctx.booking_repo
        .expect_update_status()
        .with(predicate::eq(id), predicate::eq(BookingStatus::Confirmed))
        .returning(|id, status| Ok(pending_booking(id, status.as_str())));

    let updated = update_status_flow(&ctx, id, "Confirmed").await.unwrap();
    assert_eq!(updated.status, "Confirmed");
}
