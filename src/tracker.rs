//! Polling client for the bus tracker API.
//!
//! Mirrors what the parent app does: log in, list the children, then poll
//! each child's bus location on a fixed interval.

use anyhow::{Result, bail};
use std::sync::Arc;
use std::time::Duration;
use tracing::{Instrument, error, info};

use crate::fetch::{HttpClient, fetch_json, post_json};
use crate::output::{TrackRecord, append_record};
use crate::route::Coordinate;
use crate::simulator::PositionSample;
use crate::wire::{Child, LoginRequest, LoginResponse};

/// Typed access to the `/api` routes of a running tracker.
pub struct TrackerClient<C> {
    client: C,
    base_url: String,
}

impl<C: HttpClient> TrackerClient<C> {
    /// `base_url` is the server root, e.g. `http://localhost:8001`.
    pub fn new(client: C, base_url: &str) -> Self {
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/api{}", self.base_url, path)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        post_json(&self.client, &self.url("/login"), &body).await
    }

    pub async fn children(&self, parent_id: &str) -> Result<Vec<Child>> {
        fetch_json(&self.client, &self.url(&format!("/children/{parent_id}"))).await
    }

    pub async fn child(&self, child_id: &str) -> Result<Child> {
        fetch_json(&self.client, &self.url(&format!("/child/{child_id}"))).await
    }

    pub async fn bus_location(&self, bus_id: &str) -> Result<PositionSample> {
        fetch_json(&self.client, &self.url(&format!("/bus/{bus_id}/location"))).await
    }

    pub async fn school_location(&self) -> Result<Coordinate> {
        fetch_json(&self.client, &self.url("/school/location")).await
    }
}

/// Settings for [`track`].
#[derive(Debug, Clone)]
pub struct TrackOptions {
    pub email: String,
    pub password: String,
    /// Delay between sample rounds.
    pub interval: Duration,
    /// Number of rounds to run (0 = until interrupted).
    pub num_samples: usize,
    /// CSV file that receives one row per sampled position.
    pub output: String,
}

/// Logs in and samples every child's bus position, appending each sample to
/// the output CSV. Returns the number of rows written.
///
/// Failed position fetches are logged and skipped; the round carries on with
/// the remaining children.
#[tracing::instrument(
    skip(client, options),
    fields(email = %options.email, num_samples = options.num_samples)
)]
pub async fn track<C: HttpClient + 'static>(
    client: Arc<TrackerClient<C>>,
    options: &TrackOptions,
) -> Result<usize> {
    let session = client.login(&options.email, &options.password).await?;
    info!(parent_id = %session.parent_id, name = %session.name, "Logged in");

    let children = client.children(&session.parent_id).await?;
    if children.is_empty() {
        bail!("parent '{}' has no children to track", session.parent_id);
    }
    info!(child_count = children.len(), "Children ready for tracking");

    if options.num_samples == 0 {
        info!(
            interval_secs = options.interval.as_secs(),
            "Sampling infinitely. Press Ctrl+C to stop."
        );
    }

    let mut sample_count = 0;
    let mut rows_written = 0;

    loop {
        if options.num_samples > 0 && sample_count >= options.num_samples {
            break;
        }
        sample_count += 1;

        info!(sample = sample_count, "Starting sample round");

        let mut tasks = vec![];
        for child in &children {
            let client = client.clone();
            let child = child.clone();

            let span = tracing::info_span!(
                "track_child",
                child_id = %child.id,
                bus_id = %child.vehicle_info.vehicle_id,
            );

            let task = tokio::spawn(
                async move {
                    match client.bus_location(&child.vehicle_info.vehicle_id).await {
                        Ok(sample) => {
                            info!(
                                latitude = sample.latitude,
                                longitude = sample.longitude,
                                eta_minutes = sample.eta_minutes,
                                status = %sample.status,
                                "Bus position"
                            );
                            Some(TrackRecord::new(&child, sample))
                        }
                        Err(e) => {
                            error!(error = %e, "Bus position fetch failed");
                            None
                        }
                    }
                }
                .instrument(span),
            );
            tasks.push(task);
        }

        // Rows are appended from this task only, so the CSV header logic
        // never races.
        for task in tasks {
            match task.await {
                Ok(Some(record)) => {
                    append_record(&options.output, &record)?;
                    rows_written += 1;
                }
                Ok(None) => {}
                Err(e) => error!(error = %e, "Tracking task panicked"),
            }
        }

        if options.num_samples == 0 || sample_count < options.num_samples {
            tokio::time::sleep(options.interval).await;
        }
    }

    info!(rows_written, output = %options.output, "Finished tracking");
    Ok(rows_written)
}
