use async_trait::async_trait;
use reqwest::{Request, Response};

/// Executes HTTP requests against the tracker API.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn execute(&self, req: Request) -> reqwest::Result<Response>;
}
