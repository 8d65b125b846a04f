use std::sync::Arc;

use bus_tracker::directory::Directory;
use bus_tracker::route::Coordinate;
use bus_tracker::service::{Entity, QueryError, QueryService};
use chrono::{TimeZone, Utc};

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/alt_directory.json");

fn service() -> QueryService {
    let directory = Directory::load(FIXTURE).expect("Failed to load fixture directory");
    QueryService::new(Arc::new(directory))
}

#[test]
fn test_fixture_directory_serves_its_own_data() {
    let service = service();

    let auth = service.authenticate("rao@example.com", "Monsoon!7").unwrap();
    assert_eq!(auth.parent_id, "parent_101");

    let names: Vec<_> = service
        .list_dependents("parent_101")
        .unwrap()
        .iter()
        .map(|p| p.dependent.name.clone())
        .collect();
    assert_eq!(names, ["Meera Rao", "Arjun Rao"]);

    assert_eq!(
        service.school_location(),
        Coordinate::new(19.2288, 72.8574)
    );

    // The demo data is not mixed in.
    assert!(service.authenticate("parent@school.com", "password123").is_err());
    assert!(service.dependent("child_001").is_err());
}

#[test]
fn test_parent_without_children_is_not_found() {
    // parent_102 exists but has no children; the lookup cannot tell the
    // difference from an unknown parent.
    assert_eq!(
        service().list_dependents("parent_102").unwrap_err(),
        QueryError::NotFound {
            entity: Entity::Parent,
            id: "parent_102".to_string(),
        }
    );
}

#[test]
fn test_fixture_route_simulation() {
    let service = service();
    let now = Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 25).unwrap();

    // Two edges: halfway through the cycle is the middle waypoint.
    let sample = service.vehicle_position_at("bus_101", now).unwrap();
    assert!((sample.latitude - 19.2310).abs() < 1e-9);
    assert!((sample.longitude - 72.8520).abs() < 1e-9);
    assert_eq!(sample.status, "Near Home");
    assert_eq!(sample.eta_minutes, 5);
}

#[test]
fn test_invalid_directory_file_is_rejected() {
    let path = std::env::temp_dir().join("bus_tracker_bad_directory.json");
    std::fs::write(
        &path,
        r#"{
            "school": {"latitude": 0.0, "longitude": 0.0},
            "accounts": [],
            "vehicles": [],
            "dependents": [{
                "id": "c1", "parent_id": "p1", "name": "n", "class_name": "k",
                "section": "s", "roll_number": "1", "profile_image": "",
                "bus_id": "b1", "home_location": {"latitude": 0.0, "longitude": 0.0}
            }]
        }"#,
    )
    .unwrap();

    let err = Directory::load(&path).unwrap_err();
    assert!(format!("{err:#}").contains("unknown parent"));

    std::fs::remove_file(&path).unwrap();
}
