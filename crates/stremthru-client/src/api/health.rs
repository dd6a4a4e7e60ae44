//! Health API.

use crate::client::{RequestOptions, StremThruClient};
use crate::error::Result;
use crate::types::{HealthData, Response};

/// Health API client.
///
/// Note: the health endpoint does not require authentication.
pub struct HealthApi {
    client: StremThruClient,
}

impl HealthApi {
    pub(crate) fn new(client: StremThruClient) -> Self {
        Self { client }
    }

    /// Check service health.
    pub async fn check(&self) -> Result<Response<HealthData>> {
        self.client.request("/v0/health", RequestOptions::default()).await
    }

    /// Simple connectivity check - returns true if the service is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.check().await.is_ok()
    }
}
