//! Store API.

use reqwest::Method;
use serde_json::json;

use crate::client::{Body, RequestOptions, StremThruClient};
use crate::error::Result;
use crate::types::{
    AddMagnetData, CheckMagnetData, GenerateLinkData, GetMagnetData, ListMagnetsData, Response,
    User,
};

/// Query parameters for listing magnets.
///
/// The service clamps `limit` to 1..=500 (default 100) and `offset` to >=0
/// (default 0); values are passed through unvalidated, the service is the
/// authority on rejecting them. A value of zero is omitted from the query
/// string and therefore indistinguishable from unset on the wire.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListMagnetsParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
}

impl ListMagnetsParams {
    fn to_query(self) -> Vec<(String, String)> {
        let mut query = Vec::new();
        if let Some(limit) = self.limit.filter(|v| *v != 0) {
            query.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(offset) = self.offset.filter(|v| *v != 0) {
            query.push(("offset".to_string(), offset.to_string()));
        }
        query
    }
}

/// Store API client.
pub struct StoreApi {
    client: StremThruClient,
}

impl StoreApi {
    pub(crate) fn new(client: StremThruClient) -> Self {
        Self { client }
    }

    /// Add a magnet to the store.
    pub async fn add_magnet(&self, magnet: &str) -> Result<Response<AddMagnetData>> {
        let options = RequestOptions {
            method: Method::POST,
            body: Some(Body::Json(json!({ "magnet": magnet }))),
            query: self.client.client_ip_query(),
            ..Default::default()
        };
        self.client.request("/v0/store/magnets", options).await
    }

    /// Check instant availability of magnets.
    pub async fn check_magnet(&self, magnets: &[&str]) -> Result<Response<CheckMagnetData>> {
        self.check(magnets, None).await
    }

    /// Check instant availability of magnets, tagged with a stream id for
    /// correlation on the server side.
    pub async fn check_magnet_with_sid(
        &self,
        magnets: &[&str],
        sid: &str,
    ) -> Result<Response<CheckMagnetData>> {
        self.check(magnets, Some(sid)).await
    }

    async fn check(&self, magnets: &[&str], sid: Option<&str>) -> Result<Response<CheckMagnetData>> {
        let mut query: Vec<(String, String)> = magnets
            .iter()
            .map(|magnet| ("magnet".to_string(), (*magnet).to_string()))
            .collect();
        if let Some(sid) = sid {
            query.push(("sid".to_string(), sid.to_string()));
        }
        let options = RequestOptions {
            query,
            ..Default::default()
        };
        self.client.request("/v0/store/magnets/check", options).await
    }

    /// Generate a direct download link for a store file link.
    pub async fn generate_link(&self, link: &str) -> Result<Response<GenerateLinkData>> {
        let options = RequestOptions {
            method: Method::POST,
            body: Some(Body::Json(json!({ "link": link }))),
            query: self.client.client_ip_query(),
            ..Default::default()
        };
        self.client.request("/v0/store/link/generate", options).await
    }

    /// Get a magnet by id.
    pub async fn get_magnet(&self, magnet_id: &str) -> Result<Response<GetMagnetData>> {
        self.client
            .request(
                &format!("/v0/store/magnets/{magnet_id}"),
                RequestOptions::default(),
            )
            .await
    }

    /// Get the authenticated store user.
    pub async fn get_user(&self) -> Result<Response<User>> {
        self.client
            .request("/v0/store/user", RequestOptions::default())
            .await
    }

    /// List magnets in the store.
    pub async fn list_magnets(
        &self,
        params: ListMagnetsParams,
    ) -> Result<Response<ListMagnetsData>> {
        let options = RequestOptions {
            query: params.to_query(),
            ..Default::default()
        };
        self.client.request("/v0/store/magnets", options).await
    }

    /// Remove a magnet from the store.
    pub async fn remove_magnet(&self, magnet_id: &str) -> Result<Response<()>> {
        let options = RequestOptions {
            method: Method::DELETE,
            ..Default::default()
        };
        self.client
            .request(&format!("/v0/store/magnets/{magnet_id}"), options)
            .await
    }
}
