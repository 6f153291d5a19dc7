//! HTTP gateway for the events resource: one request per call, no retries, no caching.

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Event, EventId},
    protocol::EventPayload,
};
use tracing::debug;
use url::Url;

pub mod error;
pub use error::{ClientError, ClientResult};

pub const DEFAULT_EVENTS_URL: &str = "http://localhost:3000/events";

#[async_trait]
pub trait EventsApi: Send + Sync {
    async fn list(&self) -> ClientResult<Vec<Event>>;
    async fn create(&self, event: &EventPayload) -> ClientResult<Event>;
    /// The response body is parsed but carries nothing the caller needs.
    async fn delete(&self, id: &EventId) -> ClientResult<serde_json::Value>;
    async fn update(&self, id: &EventId, event: &EventPayload) -> ClientResult<Event>;
}

#[derive(Debug, Clone)]
pub struct HttpEventsApi {
    http: Client,
    base_url: Url,
}

impl HttpEventsApi {
    pub fn new(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> ClientResult<Self> {
        let raw = base_url.into();
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: raw.clone(),
            reason,
        };
        let base_url =
            Url::parse(raw.trim_end_matches('/')).map_err(|err| invalid(err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(invalid("cannot carry a path".to_string()));
        }
        Ok(Self { http, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// The id is pushed as one percent-encoded path segment.
    fn item_url(&self, id: &EventId) -> String {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(id.as_str());
        }
        url.into()
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body: Option<&EventPayload>,
    ) -> ClientResult<Vec<u8>> {
        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }

        let transport = |source| ClientError::Transport {
            url: url.to_string(),
            source,
        };
        let response = request.send().await.map_err(transport)?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(transport)?;
        if !status.is_success() {
            return Err(ClientError::Status {
                method,
                url: url.to_string(),
                status,
                body: String::from_utf8_lossy(&bytes).into_owned(),
            });
        }

        debug!(%method, url, %status, bytes = bytes.len(), "events api call completed");
        Ok(bytes.to_vec())
    }
}

fn decode<T: DeserializeOwned>(url: &str, bytes: &[u8]) -> ClientResult<T> {
    serde_json::from_slice(bytes).map_err(|source| ClientError::Decode {
        url: url.to_string(),
        source,
    })
}

#[async_trait]
impl EventsApi for HttpEventsApi {
    async fn list(&self) -> ClientResult<Vec<Event>> {
        let url = self.base_url();
        let bytes = self.execute(Method::GET, url, None).await?;
        decode(url, &bytes)
    }

    async fn create(&self, event: &EventPayload) -> ClientResult<Event> {
        let url = self.base_url();
        let bytes = self.execute(Method::POST, url, Some(event)).await?;
        decode(url, &bytes)
    }

    async fn delete(&self, id: &EventId) -> ClientResult<serde_json::Value> {
        let url = self.item_url(id);
        let bytes = self.execute(Method::DELETE, &url, None).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::Value::Null);
        }
        decode(&url, &bytes)
    }

    async fn update(&self, id: &EventId, event: &EventPayload) -> ClientResult<Event> {
        let url = self.item_url(id);
        let bytes = self.execute(Method::PUT, &url, Some(event)).await?;
        decode(&url, &bytes)
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
