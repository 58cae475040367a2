use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;

use tinig_types::api::{CreateStarRequest, ErrorResponse, QuoteResponse, ResonateResponse};
use tinig_types::models::Star;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// What the session needs from the Tinig server.
#[async_trait]
pub trait SkyBackend: Send + Sync {
    async fn recent_stars(&self, limit: u32) -> Result<Vec<Star>, ClientError>;

    async fn release_star(&self, content: &str) -> Result<Star, ClientError>;

    async fn resonate(&self, star_id: &str) -> Result<ResonateResponse, ClientError>;

    async fn daily_quote(&self) -> Result<QuoteResponse, ClientError>;
}

/// [`SkyBackend`] over the server's JSON API.
#[derive(Clone)]
pub struct HttpBackend {
    base_url: String,
    http_client: Client,
}

impl HttpBackend {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            http_client: Client::builder().timeout(Duration::from_secs(30)).build()?,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

async fn check(resp: reqwest::Response) -> Result<reqwest::Response, ClientError> {
    if resp.status().is_success() {
        return Ok(resp);
    }
    let status = resp.status().as_u16();
    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorResponse>(&body)
        .map(|e| e.error)
        .unwrap_or(body);
    Err(ClientError::Status { status, message })
}

#[async_trait]
impl SkyBackend for HttpBackend {
    async fn recent_stars(&self, limit: u32) -> Result<Vec<Star>, ClientError> {
        let resp = self
            .http_client
            .get(self.url("/api/stars"))
            .query(&[("limit", limit)])
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn release_star(&self, content: &str) -> Result<Star, ClientError> {
        let resp = self
            .http_client
            .post(self.url("/api/stars"))
            .json(&CreateStarRequest {
                content: content.to_string(),
            })
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn resonate(&self, star_id: &str) -> Result<ResonateResponse, ClientError> {
        let resp = self
            .http_client
            .post(self.url(&format!("/api/stars/{}/resonate", star_id)))
            .send()
            .await?;
        Ok(check(resp).await?.json().await?)
    }

    async fn daily_quote(&self) -> Result<QuoteResponse, ClientError> {
        let resp = self.http_client.get(self.url("/api/daily-quote")).send().await?;
        Ok(check(resp).await?.json().await?)
    }
}
