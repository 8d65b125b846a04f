use axum::Json;
use axum::extract::{Path, State};
use tracing::{debug, info, warn};

use super::{ApiError, SharedService};
use crate::route::Coordinate;
use crate::simulator::PositionSample;
use crate::wire::{Child, LoginRequest, LoginResponse};

#[tracing::instrument(skip_all, fields(email = %request.email))]
pub(super) async fn login(
    State(service): State<SharedService>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let auth = service
        .authenticate(&request.email, &request.password)
        .inspect_err(|_| warn!("Login rejected"))?;

    info!(parent_id = %auth.parent_id, "Login successful");
    Ok(Json(auth.into()))
}

#[tracing::instrument(skip_all, fields(parent_id = %parent_id))]
pub(super) async fn children(
    State(service): State<SharedService>,
    Path(parent_id): Path<String>,
) -> Result<Json<Vec<Child>>, ApiError> {
    let profiles = service
        .list_dependents(&parent_id)
        .inspect_err(|e| info!(error = %e, "No children"))?;

    Ok(Json(profiles.into_iter().map(Child::from).collect()))
}

#[tracing::instrument(skip_all, fields(child_id = %child_id))]
pub(super) async fn child(
    State(service): State<SharedService>,
    Path(child_id): Path<String>,
) -> Result<Json<Child>, ApiError> {
    let profile = service
        .dependent(&child_id)
        .inspect_err(|e| info!(error = %e, "Child lookup failed"))?;

    Ok(Json(profile.into()))
}

#[tracing::instrument(skip_all, fields(bus_id = %bus_id))]
pub(super) async fn bus_location(
    State(service): State<SharedService>,
    Path(bus_id): Path<String>,
) -> Result<Json<PositionSample>, ApiError> {
    let sample = service
        .vehicle_position(&bus_id)
        .inspect_err(|e| info!(error = %e, "Bus lookup failed"))?;

    debug!(
        latitude = sample.latitude,
        longitude = sample.longitude,
        eta_minutes = sample.eta_minutes,
        status = %sample.status,
        "Simulated position"
    );
    Ok(Json(sample))
}

pub(super) async fn school_location(State(service): State<SharedService>) -> Json<Coordinate> {
    Json(service.school_location())
}
