//! Clock-driven bus position simulation.
//!
//! A simulated bus sweeps its whole route once per [`CYCLE_SECONDS`] of
//! wall-clock time. The position depends only on the seconds component of
//! the supplied instant, so any sample can be replayed from its timestamp.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::route::{Coordinate, Route};

/// Length of one full school-to-home sweep.
pub const CYCLE_SECONDS: u32 = 50;

/// Cosmetic minutes attributed to each route edge in the ETA countdown.
pub const MINUTES_PER_EDGE: u32 = 5;

pub const STATUS_ON_ROUTE: &str = "On Route";
pub const STATUS_NEAR_HOME: &str = "Near Home";

/// A simulated live location, as reported to polling clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSample {
    pub vehicle_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timestamp: DateTime<Utc>,
    pub eta_minutes: u32,
    pub status: String,
}

impl PositionSample {
    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.latitude, self.longitude)
    }
}

/// Where along the route a given instant lands.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgePosition {
    /// Index of the edge (`0..edge_count`).
    pub index: usize,
    /// Distance travelled along the edge, in fiftieths (`0..CYCLE_SECONDS`).
    pub elapsed: u32,
}

impl EdgePosition {
    /// Fraction travelled along the edge, in `[0, 1)`.
    pub fn local_progress(&self) -> f64 {
        f64::from(self.elapsed) / f64::from(CYCLE_SECONDS)
    }

    /// `round((1 - local_progress) * MINUTES_PER_EDGE)`, ties rounding up.
    pub fn edge_minutes(&self) -> u32 {
        let left = CYCLE_SECONDS - self.elapsed;
        (left * MINUTES_PER_EDGE * 2 + CYCLE_SECONDS) / (CYCLE_SECONDS * 2)
    }
}

/// Position within the cycle, `0..CYCLE_SECONDS`, from the sub-minute seconds of `now`.
pub fn cycle_second(now: DateTime<Utc>) -> u32 {
    now.second() % CYCLE_SECONDS
}

/// Splits the cycle position of `now` into an edge index and the distance
/// travelled along that edge.
///
/// Each of the `edge_count` edges gets an equal share of the cycle. The
/// index is clamped to the last edge. All arithmetic is on integers, so edge
/// boundaries and ETA ties are exact.
pub fn edge_position(now: DateTime<Utc>, edge_count: usize) -> EdgePosition {
    debug_assert!(edge_count > 0);

    let scaled = u64::from(cycle_second(now)) * edge_count as u64;
    let cycle = u64::from(CYCLE_SECONDS);
    let index = usize::try_from(scaled / cycle)
        .unwrap_or(usize::MAX)
        .min(edge_count - 1);
    let elapsed = scaled - index as u64 * cycle;

    EdgePosition {
        index,
        // below one cycle once the index is in range
        elapsed: u32::try_from(elapsed).unwrap_or(CYCLE_SECONDS - 1),
    }
}

fn lerp(start: f64, end: f64, t: f64) -> f64 {
    start + (end - start) * t
}

/// Simulates where `vehicle_id` is on `route` at `now`.
///
/// Pure: never reads the system clock and keeps no state between calls.
pub fn simulate(route: &Route, vehicle_id: &str, now: DateTime<Utc>) -> PositionSample {
    let edge_count = route.edge_count();
    let position = edge_position(now, edge_count);
    let index = position.index;
    let local_progress = position.local_progress();
    let (start, end) = route.edge(index);

    let remaining_edges = u32::try_from(edge_count - index - 1).unwrap_or(u32::MAX);
    let eta_minutes = remaining_edges
        .saturating_mul(MINUTES_PER_EDGE)
        .saturating_add(position.edge_minutes());

    let status = if index + 1 >= edge_count {
        STATUS_NEAR_HOME
    } else {
        STATUS_ON_ROUTE
    };

    PositionSample {
        vehicle_id: vehicle_id.to_string(),
        latitude: lerp(start.latitude, end.latitude, local_progress),
        longitude: lerp(start.longitude, end.longitude, local_progress),
        timestamp: now,
        eta_minutes,
        status: status.to_string(),
    }
}
