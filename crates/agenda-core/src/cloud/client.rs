//! REST client for the remote task/event store.

use reqwest::{Client, RequestBuilder};
use std::time::Duration;
use tracing::debug;

use super::codec;
use crate::error::CloudError;
use crate::model::{Event, Task};
use crate::storage::CloudConfig;

/// Thin async client over the remote API.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct CloudClient {
    http: Client,
    base_url: String,
}

impl CloudClient {
    /// Create a client for `base_url` (e.g. `http://localhost:8080/api`).
    ///
    /// # Errors
    /// Returns an error if the URL is not an absolute http(s) URL.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, CloudError> {
        let parsed = url::Url::parse(base_url).map_err(|e| CloudError::InvalidBaseUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CloudError::InvalidBaseUrl {
                url: base_url.to_string(),
                message: format!("unsupported scheme '{}'", parsed.scheme()),
            });
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Build a client from configuration; `None` when cloud access is disabled.
    pub fn from_config(config: &CloudConfig) -> Result<Option<Self>, CloudError> {
        if !config.enabled {
            return Ok(None);
        }
        Self::new(&config.base_url, Duration::from_secs(config.timeout_secs)).map(Some)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, segments: &[&str]) -> String {
        let mut url = self.base_url.clone();
        for segment in segments {
            url.push('/');
            url.push_str(&urlencoding::encode(segment));
        }
        url
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: RequestBuilder) -> Result<String, CloudError> {
        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.text().await?;
        if status.is_success() {
            Ok(body)
        } else {
            Err(CloudError::Status {
                status: status.as_u16(),
                body,
            })
        }
    }

    /// Ask the server for a fresh device UUID.
    pub async fn generate_uuid(&self) -> Result<String, CloudError> {
        let body = self.send(self.http.get(self.url(&["uuid"]))).await?;
        let uuid = body.trim().trim_matches('"').to_string();
        if uuid.is_empty() {
            return Err(CloudError::Parse("empty UUID response".into()));
        }
        Ok(uuid)
    }

    // === Tasks ===

    pub async fn create_task(&self, device_id: &str, task: &Task) -> Result<(), CloudError> {
        let url = self.url(&["todos", device_id]);
        self.send(self.http.post(url).json(&codec::task_to_json(task))).await?;
        debug!(task_id = %task.id, "task created in cloud");
        Ok(())
    }

    pub async fn update_task(&self, device_id: &str, task: &Task) -> Result<(), CloudError> {
        let url = self.url(&["todos", device_id, &task.id]);
        self.send(self.http.put(url).json(&codec::task_to_json(task))).await?;
        debug!(task_id = %task.id, "task updated in cloud");
        Ok(())
    }

    pub async fn delete_task(&self, device_id: &str, task_id: &str) -> Result<(), CloudError> {
        let url = self.url(&["todos", device_id, task_id]);
        self.send(self.http.delete(url)).await?;
        debug!(task_id = %task_id, "task deleted in cloud");
        Ok(())
    }

    pub async fn list_tasks(&self, device_id: &str) -> Result<Vec<Task>, CloudError> {
        let body = self.send(self.http.get(self.url(&["todos", device_id]))).await?;
        codec::parse_task_list(&body)
    }

    // === Events ===

    pub async fn create_event(&self, device_id: &str, event: &Event) -> Result<(), CloudError> {
        let url = self.url(&["events", device_id]);
        self.send(self.http.post(url).json(&codec::event_to_json(event))).await?;
        debug!(event_id = %event.id, "event created in cloud");
        Ok(())
    }

    pub async fn update_event(&self, device_id: &str, event: &Event) -> Result<(), CloudError> {
        let url = self.url(&["events", device_id, &event.id]);
        self.send(self.http.put(url).json(&codec::event_to_json(event))).await?;
        debug!(event_id = %event.id, "event updated in cloud");
        Ok(())
    }

    pub async fn delete_event(&self, device_id: &str, event_id: &str) -> Result<(), CloudError> {
        let url = self.url(&["events", device_id, event_id]);
        self.send(self.http.delete(url)).await?;
        debug!(event_id = %event_id, "event deleted in cloud");
        Ok(())
    }

    pub async fn list_events(&self, device_id: &str) -> Result<Vec<Event>, CloudError> {
        let body = self.send(self.http.get(self.url(&["events", device_id]))).await?;
        codec::parse_event_list(&body)
    }

    // === Sharing ===

    /// Publish an event for sharing. Returns the lookup code (the event id).
    pub async fn share_event(&self, event: &Event) -> Result<String, CloudError> {
        let url = self.url(&["share"]);
        self.send(self.http.post(url).json(&codec::event_to_json(event))).await?;
        debug!(event_id = %event.id, "event shared");
        Ok(event.id.clone())
    }

    /// Look up a shared event by its code.
    pub async fn fetch_shared_event(&self, code: &str) -> Result<Event, CloudError> {
        let code = code.trim();
        if code.is_empty() {
            return Err(CloudError::Parse("empty share code".into()));
        }
        let body = self.send(self.http.get(self.url(&["share", code]))).await?;
        codec::parse_event(&body)
    }
}
