use std::time::Duration;

use reqwest::{Client, Response, StatusCode, Url};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::types::{CreateTaskBody, ErrorBody, Task, UpdateTaskBody};

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid task service url: {0}")]
    InvalidUrl(String),
    #[error("could not reach the task service: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("task service answered {status}: {message}")]
    Api { status: StatusCode, message: String },
    #[error("unexpected response from the task service: {0}")]
    Decode(#[source] reqwest::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api { status, .. } if *status == StatusCode::NOT_FOUND)
    }

    fn from_body(error: reqwest::Error) -> Self {
        if error.is_decode() {
            Self::Decode(error)
        } else {
            Self::Transport(error)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;

/// Typed HTTP client for the `/tasks` API.
#[derive(Clone, Debug)]
pub struct TaskClient {
    base_url: Url,
    http_client: Client,
}

impl TaskClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::builder().base_url(base_url).build()
    }

    pub fn builder() -> TaskClientBuilder {
        TaskClientBuilder::new()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `GET /tasks`
    pub async fn list(&self) -> Result<Vec<Task>> {
        let response = self
            .http_client
            .get(self.endpoint(None)?)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        read_json(response).await
    }

    /// `POST /tasks`
    pub async fn create(&self, text: &str) -> Result<Task> {
        let response = self
            .http_client
            .post(self.endpoint(None)?)
            .json(&CreateTaskBody { text })
            .send()
            .await
            .map_err(ClientError::Transport)?;
        read_json(response).await
    }

    /// `PUT /tasks/:id`
    pub async fn set_completed(&self, id: &str, completed: bool) -> Result<Task> {
        let response = self
            .http_client
            .put(self.endpoint(Some(id))?)
            .json(&UpdateTaskBody { completed })
            .send()
            .await
            .map_err(ClientError::Transport)?;
        read_json(response).await
    }

    /// `DELETE /tasks/:id`
    pub async fn delete(&self, id: &str) -> Result<()> {
        let response = self
            .http_client
            .delete(self.endpoint(Some(id))?)
            .send()
            .await
            .map_err(ClientError::Transport)?;
        check_status(response).await?;
        Ok(())
    }

    fn endpoint(&self, id: Option<&str>) -> Result<Url> {
        let mut url = self.base_url.clone();
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| ClientError::InvalidUrl(self.base_url.to_string()))?;
            segments.pop_if_empty().push("tasks");
            if let Some(id) = id {
                segments.push(id);
            }
        }
        Ok(url)
    }
}

pub struct TaskClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
}

impl TaskClientBuilder {
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: None,
        }
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<TaskClient> {
        let raw = self.base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let base_url = Url::parse(&raw)
            .map_err(|error| ClientError::InvalidUrl(format!("{raw}: {error}")))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl(raw));
        }

        let mut http_client = Client::builder();
        if let Some(timeout) = self.timeout {
            http_client = http_client.timeout(timeout);
        }
        let http_client = http_client.build().map_err(ClientError::Transport)?;

        Ok(TaskClient {
            base_url,
            http_client,
        })
    }
}

impl Default for TaskClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    let response = check_status(response).await?;
    response.json::<T>().await.map_err(ClientError::from_body)
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.error,
        Err(_) => status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string(),
    };
    Err(ClientError::Api { status, message })
}
