//! HTTP transport for the [`QueryService`].
//!
//! Routes live under `/api` and speak JSON. Responses carry permissive CORS
//! headers so the mobile/web client can call the API from any origin.

mod error;
mod handlers;

pub use error::ApiError;

use anyhow::Result;
use axum::Router;
use axum::extract::Request;
use axum::http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::{HeaderValue, Method, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use std::future::Future;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

use crate::service::QueryService;

pub(crate) type SharedService = Arc<QueryService>;

/// Builds the `/api` router over `service`.
pub fn router(service: Arc<QueryService>) -> Router {
    let api = Router::new()
        .route("/login", post(handlers::login))
        .route("/children/{parent_id}", get(handlers::children))
        .route("/child/{child_id}", get(handlers::child))
        .route("/bus/{bus_id}/location", get(handlers::bus_location))
        .route("/school/location", get(handlers::school_location));

    Router::new()
        .nest("/api", api)
        .layer(middleware::from_fn(cors))
        .with_state(service)
}

/// Answers preflight requests and stamps CORS headers on every response.
async fn cors(request: Request, next: Next) -> Response {
    let mut response = if request.method() == Method::OPTIONS {
        StatusCode::NO_CONTENT.into_response()
    } else {
        next.run(request).await
    };

    let headers = response.headers_mut();
    let any = HeaderValue::from_static("*");
    headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, any.clone());
    headers.insert(ACCESS_CONTROL_ALLOW_METHODS, any.clone());
    headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, any);
    response
}

/// Serves the API on `listener` until `shutdown` resolves.
///
/// # Errors
///
/// Returns an error if the underlying server fails while accepting connections.
pub async fn serve<F>(listener: TcpListener, service: Arc<QueryService>, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr = listener.local_addr()?;
    info!(%addr, "Bus tracker API listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Bus tracker API stopped");
    Ok(())
}
