mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::{Context, Result};
use reqwest::header::{CONTENT_TYPE, HeaderValue};
use reqwest::{Method, Request, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::wire::ErrorBody;

/// Error returned when the API answers with a non-success status.
///
/// Callers can downcast an [`anyhow::Error`] to this to tell a 401/404
/// apart from transport failures.
#[derive(Debug, thiserror::Error)]
#[error("API returned status {status}: {detail}")]
pub struct ApiStatusError {
    pub status: StatusCode,
    pub detail: String,
}

pub async fn fetch_json<C: HttpClient, T: DeserializeOwned>(client: &C, url: &str) -> Result<T> {
    let req = Request::new(Method::GET, url.parse()?);
    let resp = client.execute(req).await?;
    decode(resp).await
}

pub async fn post_json<C: HttpClient, B: Serialize, T: DeserializeOwned>(
    client: &C,
    url: &str,
    body: &B,
) -> Result<T> {
    let mut req = Request::new(Method::POST, url.parse()?);
    req.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    *req.body_mut() = Some(serde_json::to_vec(body)?.into());

    let resp = client.execute(req).await?;
    decode(resp).await
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T> {
    let status = resp.status();
    let url = resp.url().to_string();

    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ErrorBody>(&body)
            .map(|e| e.detail)
            .unwrap_or(body);
        return Err(ApiStatusError { status, detail }.into());
    }

    resp.json::<T>()
        .await
        .with_context(|| format!("Failed to parse response from {url}"))
}
