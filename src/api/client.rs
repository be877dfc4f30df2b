//! HTTP client for the fleet registry and telemetry API.
//!
//! All calls go over an authenticated transport: the bearer token held by the
//! [`Session`] is injected per request. A 401 response clears the stored
//! credential and surfaces as [`ApiError::Unauthorized`] so callers can force
//! re-authentication instead of retrying into a storm.

use std::sync::Arc;
use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::Deserialize;

use crate::data::{Machine, MachineId, MachinePayload, MachineUpdate, Reading};

use super::error::ApiError;
use super::session::Session;

/// Client for the fleet API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Arc<Session>,
}

impl ApiClient {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// The session holding this client's credential.
    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Authenticate and store the resulting bearer token in the session.
    ///
    /// `POST /auth/token`, form-encoded per the OAuth2 password flow.
    pub async fn login(&self, username: &str, password: &str) -> Result<(), ApiError> {
        let response = self
            .client
            .post(self.url("/auth/token"))
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        let response = self.check(response).await?;
        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        self.session.set_token(&token.access_token);
        Ok(())
    }

    /// Fetch the full machine registry. `GET /machines`
    pub async fn list_machines(&self) -> Result<Vec<Machine>, ApiError> {
        self.get_json("/machines").await
    }

    /// Fetch the most recent reading per machine. `GET /data/latest`
    pub async fn latest_readings(&self) -> Result<Vec<Reading>, ApiError> {
        self.get_json("/data/latest").await
    }

    /// Fetch a single machine. `GET /machines/{id}`
    pub async fn get_machine(&self, id: MachineId) -> Result<Machine, ApiError> {
        self.get_json(&format!("/machines/{}", id)).await
    }

    /// Fetch a machine's recent reading history, oldest first.
    ///
    /// The server returns newest-first; the result is reversed here so that
    /// consumers get chronological order. `GET /data/{id}?limit=N`
    pub async fn machine_history(
        &self,
        id: MachineId,
        limit: usize,
    ) -> Result<Vec<Reading>, ApiError> {
        let mut readings: Vec<Reading> = self
            .get_json(&format!("/data/{}?limit={}", id, limit))
            .await?;
        readings.reverse();
        Ok(readings)
    }

    /// Register a new machine. `POST /machines`
    pub async fn create_machine(&self, payload: &MachinePayload) -> Result<Machine, ApiError> {
        let response = self
            .authed(self.client.post(self.url("/machines")))
            .json(payload)
            .send()
            .await?;
        self.parse_json(response).await
    }

    /// Update an existing machine. `PUT /machines/{id}`
    pub async fn update_machine(
        &self,
        id: MachineId,
        payload: &MachineUpdate,
    ) -> Result<Machine, ApiError> {
        let response = self
            .authed(self.client.put(self.url(&format!("/machines/{}", id))))
            .json(payload)
            .send()
            .await?;
        self.parse_json(response).await
    }

    /// Delete a machine. `DELETE /machines/{id}`
    ///
    /// Callers should drop any local entry only after this succeeds.
    pub async fn delete_machine(&self, id: MachineId) -> Result<(), ApiError> {
        let response = self
            .authed(self.client.delete(self.url(&format!("/machines/{}", id))))
            .send()
            .await?;
        self.check(response).await?;
        Ok(())
    }

    /// Download the fleet summary report as raw PDF bytes.
    ///
    /// Stateless pass-through. `GET /reports/summary`
    pub async fn summary_report(&self) -> Result<Vec<u8>, ApiError> {
        let response = self
            .authed(self.client.get(self.url("/reports/summary")))
            .send()
            .await?;
        let response = self.check(response).await?;
        let bytes = response.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    /// Attach the bearer token, if the session holds one.
    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn get_json<T: for<'de> Deserialize<'de>>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.authed(self.client.get(self.url(path))).send().await?;
        self.parse_json(response).await
    }

    async fn parse_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: Response,
    ) -> Result<T, ApiError> {
        let response = self.check(response).await?;
        response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))
    }

    /// Map non-success statuses to errors, invalidating the credential on 401.
    async fn check(&self, response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        let err = ApiError::from_status(status, body);
        if matches!(err, ApiError::Unauthorized) {
            self.session.clear();
        }
        Err(err)
    }
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Builder for [`ApiClient`].
#[derive(Debug, Default)]
pub struct ApiClientBuilder {
    base_url: Option<String>,
    timeout: Option<Duration>,
    session: Option<Arc<Session>>,
}

impl ApiClientBuilder {
    /// Set the API base URL (e.g. "http://localhost:8000").
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set the per-request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Attach a session (e.g. one backed by a token store).
    pub fn session(mut self, session: Arc<Session>) -> Self {
        self.session = Some(session);
        self
    }

    /// Build the client.
    pub fn build(self) -> ApiClient {
        let timeout = self.timeout.unwrap_or(Duration::from_secs(10));

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .expect("Failed to build HTTP client");

        ApiClient {
            client,
            base_url: self
                .base_url
                .unwrap_or_else(|| "http://localhost:8000".to_string()),
            session: self.session.unwrap_or_default(),
        }
    }
}
