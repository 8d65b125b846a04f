//! Read-only directory of parents, children and buses.
//!
//! A [`Directory`] is built once at startup, either from the built-in demo
//! dataset ([`Directory::demo`]) or from a JSON file ([`Directory::load`]).
//! Foreign keys are checked at construction so lookups never have to deal
//! with dangling references.

mod demo;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::route::{Coordinate, Route, RouteError};

/// A parent login. The password is stored and compared in plaintext; this is
/// a mock account table, not a credential store.
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub id: String,
    pub email: String,
    pub password: String,
    pub name: String,
}

/// A school bus and the route its simulated position follows.
#[derive(Debug, Clone, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Display number painted on the bus, e.g. `SB-42`.
    pub number: String,
    #[serde(rename = "driver_name")]
    pub operator_name: String,
    #[serde(rename = "route_name")]
    pub route_label: String,
    /// Static status shown on the child's profile card.
    pub status: String,
    pub route: Route,
}

/// A child tracked through their assigned bus.
#[derive(Debug, Clone, Deserialize)]
pub struct Dependent {
    pub id: String,
    pub parent_id: String,
    pub name: String,
    pub class_name: String,
    pub section: String,
    pub roll_number: String,
    pub profile_image: String,
    #[serde(rename = "bus_id")]
    pub vehicle_id: String,
    pub home_location: Coordinate,
}

/// A child joined with the bus they ride.
#[derive(Debug, Clone, Copy)]
pub struct DependentProfile<'a> {
    pub dependent: &'a Dependent,
    pub vehicle: &'a Vehicle,
}

/// Raw directory contents, as read from JSON or assembled in code.
#[derive(Debug, Clone, Deserialize)]
pub struct DirectoryData {
    pub school: Coordinate,
    pub accounts: Vec<Account>,
    pub vehicles: Vec<Vehicle>,
    pub dependents: Vec<Dependent>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DirectoryError {
    #[error("duplicate account id '{0}'")]
    DuplicateAccount(String),
    #[error("duplicate account email '{0}'")]
    DuplicateEmail(String),
    #[error("duplicate bus id '{0}'")]
    DuplicateVehicle(String),
    #[error("duplicate child id '{0}'")]
    DuplicateDependent(String),
    #[error("child '{dependent}' references unknown parent '{parent}'")]
    UnknownParent { dependent: String, parent: String },
    #[error("child '{dependent}' references unknown bus '{vehicle}'")]
    UnknownVehicle { dependent: String, vehicle: String },
    #[error("invalid route: {0}")]
    Route(#[from] RouteError),
}

/// Immutable lookup tables over a validated [`DirectoryData`].
#[derive(Debug)]
pub struct Directory {
    school: Coordinate,
    accounts: Vec<Account>,
    account_by_email: HashMap<String, usize>,
    vehicles: Vec<Vehicle>,
    vehicle_by_id: HashMap<String, usize>,
    dependents: Vec<Dependent>,
    dependent_by_id: HashMap<String, usize>,
    /// Index into `vehicles` for each entry of `dependents`.
    dependent_vehicle: Vec<usize>,
}

impl Directory {
    /// Validates `data` and builds the lookup indexes.
    ///
    /// # Errors
    ///
    /// Fails on duplicate ids or emails, and on children whose parent or bus
    /// does not exist.
    pub fn new(data: DirectoryData) -> Result<Self, DirectoryError> {
        let DirectoryData {
            school,
            accounts,
            vehicles,
            dependents,
        } = data;

        let mut account_by_email = HashMap::with_capacity(accounts.len());
        let mut account_ids = HashSet::with_capacity(accounts.len());
        for (i, account) in accounts.iter().enumerate() {
            if !account_ids.insert(account.id.as_str()) {
                return Err(DirectoryError::DuplicateAccount(account.id.clone()));
            }
            if account_by_email.insert(account.email.clone(), i).is_some() {
                return Err(DirectoryError::DuplicateEmail(account.email.clone()));
            }
        }

        let mut vehicle_by_id = HashMap::with_capacity(vehicles.len());
        for (i, vehicle) in vehicles.iter().enumerate() {
            if vehicle_by_id.insert(vehicle.id.clone(), i).is_some() {
                return Err(DirectoryError::DuplicateVehicle(vehicle.id.clone()));
            }
        }

        let mut dependent_by_id = HashMap::with_capacity(dependents.len());
        let mut dependent_vehicle = Vec::with_capacity(dependents.len());
        for (i, dependent) in dependents.iter().enumerate() {
            if dependent_by_id.insert(dependent.id.clone(), i).is_some() {
                return Err(DirectoryError::DuplicateDependent(dependent.id.clone()));
            }
            if !account_ids.contains(dependent.parent_id.as_str()) {
                return Err(DirectoryError::UnknownParent {
                    dependent: dependent.id.clone(),
                    parent: dependent.parent_id.clone(),
                });
            }
            let Some(&vehicle) = vehicle_by_id.get(&dependent.vehicle_id) else {
                return Err(DirectoryError::UnknownVehicle {
                    dependent: dependent.id.clone(),
                    vehicle: dependent.vehicle_id.clone(),
                });
            };
            dependent_vehicle.push(vehicle);
        }

        debug!(
            accounts = accounts.len(),
            vehicles = vehicles.len(),
            dependents = dependents.len(),
            "Directory validated"
        );

        Ok(Self {
            school,
            accounts,
            account_by_email,
            vehicles,
            vehicle_by_id,
            dependents,
            dependent_by_id,
            dependent_vehicle,
        })
    }

    /// The built-in demo dataset: one parent, two children, two buses.
    ///
    /// # Errors
    ///
    /// Only fails if the bundled data itself is inconsistent.
    pub fn demo() -> Result<Self, DirectoryError> {
        Self::new(demo::data()?)
    }

    /// Loads and validates a directory from a JSON file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid directory
    /// JSON, or fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read directory file '{}'", path.display()))?;
        let data: DirectoryData = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse directory file '{}'", path.display()))?;
        let directory = Self::new(data)
            .with_context(|| format!("invalid directory file '{}'", path.display()))?;

        info!(path = %path.display(), "Directory loaded from file");
        Ok(directory)
    }

    pub fn school(&self) -> Coordinate {
        self.school
    }

    pub fn account_by_email(&self, email: &str) -> Option<&Account> {
        self.account_by_email
            .get(email)
            .map(|&i| &self.accounts[i])
    }

    pub fn vehicle(&self, vehicle_id: &str) -> Option<&Vehicle> {
        self.vehicle_by_id
            .get(vehicle_id)
            .map(|&i| &self.vehicles[i])
    }

    pub fn route(&self, vehicle_id: &str) -> Option<&Route> {
        self.vehicle(vehicle_id).map(|v| &v.route)
    }

    pub fn dependent(&self, dependent_id: &str) -> Option<DependentProfile<'_>> {
        self.dependent_by_id
            .get(dependent_id)
            .map(|&i| self.profile(i))
    }

    /// Children of `parent_id` with their buses, in insertion order.
    pub fn dependents_of<'a, 'b>(
        &'a self,
        parent_id: &'b str,
    ) -> impl Iterator<Item = DependentProfile<'a>> + use<'a, 'b> {
        self.dependents
            .iter()
            .enumerate()
            .filter(move |(_, d)| d.parent_id == parent_id)
            .map(move |(i, _)| self.profile(i))
    }

    // `dependent_vehicle` was filled from `vehicle_by_id` in `new`, so both
    // indexes are in bounds.
    fn profile(&self, index: usize) -> DependentProfile<'_> {
        DependentProfile {
            dependent: &self.dependents[index],
            vehicle: &self.vehicles[self.dependent_vehicle[index]],
        }
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    pub fn vehicles(&self) -> &[Vehicle] {
        &self.vehicles
    }

    pub fn dependents(&self) -> &[Dependent] {
        &self.dependents
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn route() -> Route {
        Route::new(vec![Coordinate::new(0.0, 0.0), Coordinate::new(1.0, 1.0)]).unwrap()
    }

    fn account(id: &str, email: &str) -> Account {
        Account {
            id: id.to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
            name: format!("Parent {id}"),
        }
    }

    fn vehicle(id: &str) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            number: "SB-1".to_string(),
            operator_name: "Driver".to_string(),
            route_label: "Route".to_string(),
            status: "At School".to_string(),
            route: route(),
        }
    }

    fn dependent(id: &str, parent: &str, vehicle: &str) -> Dependent {
        Dependent {
            id: id.to_string(),
            parent_id: parent.to_string(),
            name: format!("Child {id}"),
            class_name: "1st Grade".to_string(),
            section: "A".to_string(),
            roll_number: "01".to_string(),
            profile_image: String::new(),
            vehicle_id: vehicle.to_string(),
            home_location: Coordinate::new(1.0, 1.0),
        }
    }

    fn data() -> DirectoryData {
        DirectoryData {
            school: Coordinate::new(0.0, 0.0),
            accounts: vec![account("p1", "a@x.com"), account("p2", "b@x.com")],
            vehicles: vec![vehicle("v1")],
            dependents: vec![
                dependent("c1", "p1", "v1"),
                dependent("c2", "p2", "v1"),
                dependent("c3", "p1", "v1"),
            ],
        }
    }

    #[test]
    fn test_demo_directory_is_valid() {
        let directory = Directory::demo().unwrap();
        assert_eq!(directory.accounts().len(), 1);
        assert_eq!(directory.vehicles().len(), 2);
        assert_eq!(directory.dependents().len(), 2);
    }

    #[test]
    fn test_dependents_of_keeps_insertion_order() {
        let directory = Directory::new(data()).unwrap();
        let ids: Vec<_> = directory
            .dependents_of("p1")
            .map(|p| p.dependent.id.as_str())
            .collect();
        assert_eq!(ids, ["c1", "c3"]);
    }

    #[test]
    fn test_profiles_outlive_parent_id() {
        let mut data = data();
        data.vehicles.push(vehicle("v2"));
        data.dependents.push(dependent("c4", "p1", "v2"));
        let directory = Directory::new(data).unwrap();

        let profiles: Vec<_> = {
            let parent_id = String::from("p1");
            directory.dependents_of(&parent_id).collect()
        };

        let pairs: Vec<_> = profiles
            .iter()
            .map(|p| (p.dependent.id.as_str(), p.vehicle.id.as_str()))
            .collect();
        assert_eq!(pairs, [("c1", "v1"), ("c3", "v1"), ("c4", "v2")]);
    }

    #[test]
    fn test_lookups() {
        let directory = Directory::new(data()).unwrap();
        assert_eq!(directory.account_by_email("b@x.com").unwrap().id, "p2");
        assert!(directory.account_by_email("B@x.com").is_none());
        assert_eq!(directory.dependent("c2").unwrap().dependent.parent_id, "p2");
        assert!(directory.dependent("c9").is_none());
        assert!(directory.route("v1").is_some());
        assert!(directory.route("v2").is_none());
    }

    #[test]
    fn test_rejects_unknown_parent() {
        let mut data = data();
        data.dependents.push(dependent("c4", "p9", "v1"));
        assert_eq!(
            Directory::new(data).unwrap_err(),
            DirectoryError::UnknownParent {
                dependent: "c4".to_string(),
                parent: "p9".to_string(),
            }
        );
    }

    #[test]
    fn test_rejects_unknown_vehicle() {
        let mut data = data();
        data.dependents.push(dependent("c4", "p1", "v9"));
        assert!(matches!(
            Directory::new(data),
            Err(DirectoryError::UnknownVehicle { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates() {
        let mut dup_child = data();
        dup_child.dependents.push(dependent("c1", "p1", "v1"));
        assert_eq!(
            Directory::new(dup_child).unwrap_err(),
            DirectoryError::DuplicateDependent("c1".to_string())
        );

        let mut dup_email = data();
        dup_email.accounts.push(account("p3", "a@x.com"));
        assert_eq!(
            Directory::new(dup_email).unwrap_err(),
            DirectoryError::DuplicateEmail("a@x.com".to_string())
        );

        let mut dup_bus = data();
        dup_bus.vehicles.push(vehicle("v1"));
        assert_eq!(
            Directory::new(dup_bus).unwrap_err(),
            DirectoryError::DuplicateVehicle("v1".to_string())
        );
    }

    #[test]
    fn test_load_missing_file_fails() {
        let result = Directory::load("/nonexistent/directory.json");
        assert!(result.is_err());
    }
}
