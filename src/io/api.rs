//! Server contract: wire types, the `Backend` trait, and its HTTP client.

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::{CardRef, Record, ServerConfig};

/// Body of a status-update request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub model: String,
    pub id: String,
    pub status: String,
}

/// Response of the suggestion endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsersResponse {
    #[serde(default)]
    pub users: Vec<String>,
}

/// Error type for backend calls
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Network(#[from] reqwest::Error),
    #[error("server returned {status} for {url}")]
    Status { status: u16, url: String },
    #[error("malformed response: {0}")]
    Malformed(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
}

/// The three calls the board makes against the server.
///
/// Implementations block; the dispatcher runs them off the UI thread.
pub trait Backend: Send + Sync {
    fn update_status(&self, update: &StatusUpdate) -> Result<(), ApiError>;
    fn fetch_record(&self, card: &CardRef) -> Result<Record, ApiError>;
    fn suggest_users(&self, query: &str) -> Result<Vec<String>, ApiError>;
}

/// Backend speaking JSON over HTTP
pub struct HttpBackend {
    client: Client,
    server: ServerConfig,
}

impl HttpBackend {
    pub fn new(server: &ServerConfig) -> Result<Self, ApiError> {
        let client = Client::builder().timeout(server.timeout()).build()?;
        Ok(HttpBackend {
            client,
            server: server.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.server.base_url.trim_end_matches('/'), path)
    }

    /// `{record_path}/{model}/{id}` with both parts percent-encoded
    fn record_url(&self, card: &CardRef) -> Result<reqwest::Url, ApiError> {
        let mut url = reqwest::Url::parse(&self.url(&self.server.record_path))
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.server.base_url.clone()))?
            .pop_if_empty()
            .push(&card.model)
            .push(&card.id);
        Ok(url)
    }

    fn user_agent() -> String {
        format!("crmboard/{}", env!("CARGO_PKG_VERSION"))
    }

    fn check(response: reqwest::blocking::Response) -> Result<reqwest::blocking::Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(ApiError::Status {
                status: status.as_u16(),
                url: response.url().to_string(),
            })
        }
    }
}

impl Backend for HttpBackend {
    fn update_status(&self, update: &StatusUpdate) -> Result<(), ApiError> {
        let url = self.url(&self.server.status_path);
        debug!(%url, model = %update.model, id = %update.id, status = %update.status, "POST status");
        let response = self
            .client
            .post(&url)
            .header(USER_AGENT, Self::user_agent())
            .json(update)
            .send()?;
        Self::check(response)?;
        Ok(())
    }

    fn fetch_record(&self, card: &CardRef) -> Result<Record, ApiError> {
        let url = self.record_url(card)?;
        debug!(%url, "GET record");
        let response = self
            .client
            .get(url.as_str())
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        let text = Self::check(response)?.text()?;
        serde_json::from_str(&text).map_err(|e| ApiError::Malformed(e.to_string()))
    }

    fn suggest_users(&self, query: &str) -> Result<Vec<String>, ApiError> {
        let url = reqwest::Url::parse_with_params(&self.url(&self.server.users_path), &[("q", query)])
            .map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
        debug!(%url, "GET users");
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, Self::user_agent())
            .header(ACCEPT, "application/json")
            .send()?;
        let text = Self::check(response)?.text()?;
        let parsed: UsersResponse =
            serde_json::from_str(&text).map_err(|e| ApiError::Malformed(e.to_string()))?;
        Ok(parsed.users)
    }
}
