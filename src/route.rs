//! Geographic coordinates and fixed vehicle routes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A WGS84 point, serialized as `{"latitude": .., "longitude": ..}`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
    #[error("route needs at least 2 waypoints, got {0}")]
    TooShort(usize),
}

/// An ordered polyline from the school (first waypoint) to home (last waypoint).
///
/// Always has at least one edge; [`Route::new`] rejects anything shorter.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Route {
    waypoints: Vec<Coordinate>,
}

impl Route {
    /// Builds a route from its waypoints.
    ///
    /// # Errors
    ///
    /// Returns [`RouteError::TooShort`] if fewer than two waypoints are given.
    pub fn new(waypoints: Vec<Coordinate>) -> Result<Self, RouteError> {
        if waypoints.len() < 2 {
            return Err(RouteError::TooShort(waypoints.len()));
        }
        Ok(Self { waypoints })
    }

    pub fn edge_count(&self) -> usize {
        self.waypoints.len() - 1
    }

    /// The two endpoints of edge `index`.
    pub fn edge(&self, index: usize) -> (Coordinate, Coordinate) {
        (self.waypoints[index], self.waypoints[index + 1])
    }

    pub fn origin(&self) -> Coordinate {
        self.waypoints[0]
    }

    pub fn destination(&self) -> Coordinate {
        self.waypoints[self.waypoints.len() - 1]
    }
}

impl<'de> Deserialize<'de> for Route {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let waypoints = Vec::<Coordinate>::deserialize(deserializer)?;
        Route::new(waypoints).map_err(serde::de::Error::custom)
    }
}
