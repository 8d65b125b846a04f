//! Read-only query operations over the [`Directory`] and the position simulator.
//!
//! Every operation is a pure read. A single [`QueryService`] is shared across
//! request handlers behind an `Arc` without any locking.

use chrono::{DateTime, Utc};
use std::fmt;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::directory::{DependentProfile, Directory};
use crate::route::Coordinate;
use crate::simulator::{PositionSample, simulate};

/// The kind of record a failed lookup was looking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Parent,
    Dependent,
    Vehicle,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Entity::Parent => "parent",
            Entity::Dependent => "child",
            Entity::Vehicle => "bus",
        })
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum QueryError {
    /// Unknown email or wrong password; the two are deliberately not told apart.
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{entity} '{id}' not found")]
    NotFound { entity: Entity, id: String },
}

impl QueryError {
    fn not_found(entity: Entity, id: &str) -> Self {
        QueryError::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

/// A successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthResult {
    pub parent_id: String,
    pub name: String,
}

pub struct QueryService {
    directory: Arc<Directory>,
    clock: Arc<dyn Clock>,
}

impl QueryService {
    /// Creates a service reading time from the system clock.
    pub fn new(directory: Arc<Directory>) -> Self {
        Self::with_clock(directory, Arc::new(SystemClock))
    }

    pub fn with_clock(directory: Arc<Directory>, clock: Arc<dyn Clock>) -> Self {
        Self { directory, clock }
    }

    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Checks `email`/`password` against the account table.
    ///
    /// Both must match exactly (case-sensitive). This is a mock login with no
    /// hashing and no rate limiting.
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidCredentials`] for an unknown email or a wrong password.
    pub fn authenticate(&self, email: &str, password: &str) -> Result<AuthResult, QueryError> {
        let account = self
            .directory
            .account_by_email(email)
            .filter(|a| a.password == password)
            .ok_or(QueryError::InvalidCredentials)?;

        debug!(parent_id = %account.id, "Credentials accepted");
        Ok(AuthResult {
            parent_id: account.id.clone(),
            name: account.name.clone(),
        })
    }

    /// All children of `parent_id`, in directory order.
    ///
    /// # Errors
    ///
    /// [`QueryError::NotFound`] for [`Entity::Parent`] when there are no
    /// matching children, whether or not the parent exists.
    pub fn list_dependents(
        &self,
        parent_id: &str,
    ) -> Result<Vec<DependentProfile<'_>>, QueryError> {
        let profiles: Vec<_> = self.directory.dependents_of(parent_id).collect();

        if profiles.is_empty() {
            return Err(QueryError::not_found(Entity::Parent, parent_id));
        }
        Ok(profiles)
    }

    /// # Errors
    ///
    /// [`QueryError::NotFound`] if no child has this id.
    pub fn dependent(&self, dependent_id: &str) -> Result<DependentProfile<'_>, QueryError> {
        self.directory
            .dependent(dependent_id)
            .ok_or_else(|| QueryError::not_found(Entity::Dependent, dependent_id))
    }

    /// Simulated position of `vehicle_id` right now.
    ///
    /// # Errors
    ///
    /// [`QueryError::NotFound`] if the bus has no route.
    pub fn vehicle_position(&self, vehicle_id: &str) -> Result<PositionSample, QueryError> {
        self.vehicle_position_at(vehicle_id, self.clock.now())
    }

    /// Simulated position of `vehicle_id` at an explicit instant.
    ///
    /// # Errors
    ///
    /// [`QueryError::NotFound`] if the bus has no route.
    pub fn vehicle_position_at(
        &self,
        vehicle_id: &str,
        now: DateTime<Utc>,
    ) -> Result<PositionSample, QueryError> {
        let route = self
            .directory
            .route(vehicle_id)
            .ok_or_else(|| QueryError::not_found(Entity::Vehicle, vehicle_id))?;
        Ok(simulate(route, vehicle_id, now))
    }

    pub fn school_location(&self) -> Coordinate {
        self.directory.school()
    }
}
