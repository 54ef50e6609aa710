//! # Scheduling Engine
//!
//! Pure slot-availability and mechanic-assignment logic. Everything here
//! operates on data the caller has already fetched, so it is trivially safe
//! to run concurrently; the db layer is responsible for making the
//! read-decide-write booking sequence atomic.
//!
//! ## Conventions
//!
//! - All intervals are half-open `[start, end)`: back-to-back appointments
//!   (one ends exactly when the next starts) do not conflict.
//! - Candidate start times are generated hourly from each shift's start,
//!   strictly before the shift's end, regardless of service duration. A
//!   90-minute service can therefore only start on the grid; changing this
//!   would change observable availability and is deliberately not done.
//! - Wall-clock arithmetic wraps modulo 24h. Workshops operate within a
//!   single day's shifts, so the wrap never fires in practice.

use chrono::{NaiveTime, Timelike};
use std::collections::HashSet;
use uuid::Uuid;

use crate::models::workshop::Shift;

/// Interval length used when a service does not specify one.
pub const DEFAULT_DURATION_MINUTES: i64 = 60;

/// Spacing between candidate start times within a shift. Fixed, not derived
/// from service duration.
pub const SLOT_GRANULARITY_MINUTES: i64 = 60;

const MINUTES_PER_DAY: i64 = 24 * 60;

fn minutes_from_midnight(time: NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

fn time_from_minutes(minutes: i64) -> NaiveTime {
    let m = minutes.rem_euclid(MINUTES_PER_DAY);
    NaiveTime::from_hms_opt((m / 60) as u32, (m % 60) as u32, 0)
        .expect("in range after rem_euclid")
}

/// Adds a duration to a wall-clock time-of-day, wrapping modulo 24h.
pub fn add_minutes(time: NaiveTime, minutes: i64) -> NaiveTime {
    time_from_minutes(minutes_from_midnight(time) + minutes)
}

/// Half-open interval overlap test. Touching endpoints do not overlap.
pub fn intervals_overlap(
    start_a: NaiveTime,
    end_a: NaiveTime,
    start_b: NaiveTime,
    end_b: NaiveTime,
) -> bool {
    start_a < end_b && start_b < end_a
}

/// One occupied interval in the ledger, reduced to what the scheduler needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OccupiedInterval {
    pub mechanic_id: Uuid,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Candidate start times for a single shift: one every
/// [`SLOT_GRANULARITY_MINUTES`] from the shift start, strictly before the
/// shift end. An inverted shift window yields no candidates.
pub fn shift_candidates(shift: &Shift) -> Vec<NaiveTime> {
    let end = minutes_from_midnight(shift.end_time);
    let mut current = minutes_from_midnight(shift.start_time);
    let mut starts = Vec::new();
    while current < end {
        starts.push(time_from_minutes(current));
        current += SLOT_GRANULARITY_MINUTES;
    }
    starts
}

/// Candidate start times across all shifts, in catalog order. Duplicates
/// from overlapping shifts are kept; they are harmless to the availability
/// filter.
pub fn candidate_starts(shifts: &[Shift]) -> Vec<NaiveTime> {
    shifts.iter().flat_map(shift_candidates).collect()
}

/// Mechanics tied up by a booking overlapping `[start, end)`.
pub fn busy_mechanics(
    bookings: &[OccupiedInterval],
    start: NaiveTime,
    end: NaiveTime,
) -> HashSet<Uuid> {
    bookings
        .iter()
        .filter(|b| intervals_overlap(b.start_time, b.end_time, start, end))
        .map(|b| b.mechanic_id)
        .collect()
}

/// First mechanic in directory order not in the busy set. Selection is
/// deterministic; no load balancing.
pub fn first_free_mechanic(mechanics: &[Uuid], busy: &HashSet<Uuid>) -> Option<Uuid> {
    mechanics.iter().copied().find(|id| !busy.contains(id))
}

/// Start times with at least one mechanic free for the full duration.
///
/// Combines the shift catalog's hourly candidates with ledger occupancy:
/// a slot survives iff the directory is larger than the set of mechanics
/// whose bookings overlap `[slot, slot + duration)`. Generation order is
/// preserved. An empty mechanic directory short-circuits to an empty list.
pub fn available_slots(
    shifts: &[Shift],
    mechanics: &[Uuid],
    bookings: &[OccupiedInterval],
    duration_minutes: i64,
) -> Vec<NaiveTime> {
    if mechanics.is_empty() {
        return Vec::new();
    }

    candidate_starts(shifts)
        .into_iter()
        .filter(|&start| {
            let end = add_minutes(start, duration_minutes);
            let busy = busy_mechanics(bookings, start, end);
            mechanics.len() > busy.len()
        })
        .collect()
}
