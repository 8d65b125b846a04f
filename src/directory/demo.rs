//! Built-in demo dataset.

use super::{Account, Dependent, DirectoryData, Vehicle};
use crate::route::{Coordinate, Route, RouteError};

const SCHOOL: Coordinate = Coordinate::new(37.7749, -122.4194);

// Both routes start at the school and end at the child's home.
const NORTH_DISTRICT: [Coordinate; 6] = [
    SCHOOL,
    Coordinate::new(37.7769, -122.4204),
    Coordinate::new(37.7789, -122.4144),
    Coordinate::new(37.7819, -122.4154),
    Coordinate::new(37.7849, -122.4164),
    Coordinate::new(37.7899, -122.4164),
];

const EAST_DISTRICT: [Coordinate; 5] = [
    SCHOOL,
    Coordinate::new(37.7759, -122.4164),
    Coordinate::new(37.7779, -122.4124),
    Coordinate::new(37.7809, -122.4104),
    Coordinate::new(37.7849, -122.4094),
];

pub(super) fn data() -> Result<DirectoryData, RouteError> {
    Ok(DirectoryData {
        school: SCHOOL,
        accounts: vec![Account {
            id: "parent_001".into(),
            email: "parent@school.com".into(),
            password: "password123".into(),
            name: "Sarah Johnson".into(),
        }],
        vehicles: vec![
            Vehicle {
                id: "bus_001".into(),
                number: "SB-42".into(),
                operator_name: "Mr. Michael Brown".into(),
                route_label: "Route A - North District".into(),
                status: "On Route".into(),
                route: Route::new(NORTH_DISTRICT.to_vec())?,
            },
            Vehicle {
                id: "bus_002".into(),
                number: "SB-17".into(),
                operator_name: "Ms. Jennifer Davis".into(),
                route_label: "Route B - East District".into(),
                status: "At School".into(),
                route: Route::new(EAST_DISTRICT.to_vec())?,
            },
        ],
        dependents: vec![
            Dependent {
                id: "child_001".into(),
                parent_id: "parent_001".into(),
                name: "Emma Johnson".into(),
                class_name: "5th Grade".into(),
                section: "A".into(),
                roll_number: "15".into(),
                profile_image: "https://i.pravatar.cc/150?img=1".into(),
                vehicle_id: "bus_001".into(),
                home_location: Coordinate::new(37.7899, -122.4164),
            },
            Dependent {
                id: "child_002".into(),
                parent_id: "parent_001".into(),
                name: "Oliver Johnson".into(),
                class_name: "3rd Grade".into(),
                section: "B".into(),
                roll_number: "08".into(),
                profile_image: "https://i.pravatar.cc/150?img=2".into(),
                vehicle_id: "bus_002".into(),
                home_location: Coordinate::new(37.7849, -122.4094),
            },
        ],
    })
}
