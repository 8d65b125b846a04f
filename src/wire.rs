//! JSON bodies exchanged over the HTTP API.
//!
//! Field names are camelCase on the wire. Both the server (serialize) and the
//! tracking client (deserialize) use these types.

use serde::{Deserialize, Serialize};

use crate::route::Coordinate;
use crate::directory::DependentProfile;
use crate::service::AuthResult;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub success: bool,
    pub parent_id: String,
    pub name: String,
    pub message: String,
}

impl From<AuthResult> for LoginResponse {
    fn from(auth: AuthResult) -> Self {
        LoginResponse {
            success: true,
            parent_id: auth.parent_id,
            name: auth.name,
            message: "Login successful".to_string(),
        }
    }
}

/// The bus a child rides, embedded in [`Child`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleInfo {
    pub vehicle_id: String,
    pub number: String,
    pub operator_name: String,
    /// Display label, e.g. "Route A - North District".
    pub route: String,
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Child {
    pub id: String,
    pub name: String,
    pub class_name: String,
    pub section: String,
    pub roll_number: String,
    pub profile_image_url: String,
    pub vehicle_info: VehicleInfo,
    pub home_location: Coordinate,
}

impl From<DependentProfile<'_>> for Child {
    fn from(DependentProfile { dependent, vehicle }: DependentProfile<'_>) -> Self {
        Child {
            id: dependent.id.clone(),
            name: dependent.name.clone(),
            class_name: dependent.class_name.clone(),
            section: dependent.section.clone(),
            roll_number: dependent.roll_number.clone(),
            profile_image_url: dependent.profile_image.clone(),
            vehicle_info: VehicleInfo {
                vehicle_id: vehicle.id.clone(),
                number: vehicle.number.clone(),
                operator_name: vehicle.operator_name.clone(),
                route: vehicle.route_label.clone(),
                status: vehicle.status.clone(),
            },
            home_location: dependent.home_location,
        }
    }
}

/// Error body, `{"detail": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
}
