//! HTTP-backed snapshot source.

use async_trait::async_trait;

use crate::api::{ApiClient, ApiError};

use super::{FetchError, SnapshotPair, SnapshotSource};

/// Fetches snapshot pairs from the fleet API.
///
/// The two GETs run concurrently; the first error wins and the cycle yields
/// no data. Authentication rejections map to [`FetchError::Unauthorized`]
/// (the client has already cleared the session token by then); everything
/// else collapses to [`FetchError::Unreachable`] and is retried next cycle.
#[derive(Debug, Clone)]
pub struct ApiSource {
    client: ApiClient,
    description: String,
}

impl ApiSource {
    pub fn new(client: ApiClient, endpoint: &str) -> Self {
        Self {
            client,
            description: format!("api: {}", endpoint),
        }
    }
}

#[async_trait]
impl SnapshotSource for ApiSource {
    async fn fetch_snapshot(&self) -> Result<SnapshotPair, FetchError> {
        let (machines, readings) = tokio::try_join!(
            self.client.list_machines(),
            self.client.latest_readings()
        )?;
        Ok((machines, readings))
    }

    fn description(&self) -> &str {
        &self.description
    }
}

impl From<ApiError> for FetchError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => FetchError::Unauthorized,
            other => FetchError::Unreachable(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_maps_to_fetch_error() {
        assert_eq!(
            FetchError::from(ApiError::Unauthorized),
            FetchError::Unauthorized
        );
        assert!(matches!(
            FetchError::from(ApiError::Unreachable("connection refused".to_string())),
            FetchError::Unreachable(_)
        ));
        // Parse and server errors are also transient from the scheduler's
        // point of view: retried next cycle, never fatal.
        assert!(matches!(
            FetchError::from(ApiError::Http("status 500".to_string())),
            FetchError::Unreachable(_)
        ));
    }

    #[test]
    fn test_description() {
        let client = ApiClient::builder().build();
        let source = ApiSource::new(client, "http://localhost:8000");
        assert_eq!(source.description(), "api: http://localhost:8000");
    }
}
