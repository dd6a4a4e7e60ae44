//! Request and response types for the StremThru API.
//!
//! These types mirror the service's wire contract. Every successful JSON
//! response wraps its payload as `{"data": ...}`; that envelope is stripped
//! by the client, so the shapes here describe the `data` field only.

use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

/// Result of one successful call: the decoded `data` payload plus response
/// metadata.
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// Decoded `data` field of the response body.
    pub data: T,
    /// Response metadata.
    pub meta: ResponseMeta,
}

/// Metadata captured from every response.
#[derive(Debug, Clone)]
pub struct ResponseMeta {
    /// Response headers. `HeaderMap` lookups are case-insensitive.
    pub headers: HeaderMap,
    /// HTTP status code.
    pub status_code: StatusCode,
    /// HTTP status text.
    pub status_text: String,
}

/// Status of a magnet within a store.
///
/// Purely descriptive; the service owns the state machine and no transitions
/// are modeled client-side. Unrecognized statuses decode as `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MagnetStatus {
    /// Cached in the store, ready to download instantly.
    Cached,
    Queued,
    Downloading,
    /// Compressing / moving.
    Processing,
    Downloaded,
    Uploading,
    Failed,
    Invalid,
    #[default]
    #[serde(other)]
    Unknown,
}

/// Subscription status of a store user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Trial,
    Premium,
    Expired,
}

/// A file within a magnet.
///
/// Check responses omit `link` and `path`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MagnetFile {
    pub index: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub size: u64,
}

/// Store user details.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub subscription_status: SubscriptionStatus,
}

/// Magnet record returned when adding a magnet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddMagnetData {
    pub id: String,
    pub hash: String,
    pub magnet: String,
    pub name: String,
    pub status: MagnetStatus,
    #[serde(default)]
    pub files: Vec<MagnetFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

/// One entry of a check-magnets response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMagnetDataItem {
    pub magnet: String,
    pub hash: String,
    pub status: MagnetStatus,
    #[serde(default)]
    pub files: Vec<MagnetFile>,
}

/// Instant-availability report for a set of magnets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckMagnetData {
    pub items: Vec<CheckMagnetDataItem>,
}

/// Magnet record returned when fetching a single magnet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetMagnetData {
    pub id: String,
    #[serde(default)]
    pub hash: String,
    pub name: String,
    pub status: MagnetStatus,
    #[serde(default)]
    pub files: Vec<MagnetFile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

/// One entry of a list-magnets response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMagnetsDataItem {
    pub id: String,
    #[serde(default)]
    pub hash: String,
    pub name: String,
    pub status: MagnetStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<String>,
}

/// A page of magnets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListMagnetsData {
    pub items: Vec<ListMagnetsDataItem>,
    pub total_items: u64,
}

/// A generated direct download link.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateLinkData {
    pub link: String,
}

/// Service health report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    pub status: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unrecognized_magnet_status_decodes_as_unknown() {
        let status: MagnetStatus = serde_json::from_str(r#""exploded""#).unwrap();
        assert_eq!(status, MagnetStatus::Unknown);

        let status: MagnetStatus = serde_json::from_str(r#""downloaded""#).unwrap();
        assert_eq!(status, MagnetStatus::Downloaded);
    }

    #[test]
    fn test_check_magnet_item_without_files() {
        let item: CheckMagnetDataItem = serde_json::from_str(
            r#"{"magnet": "magnet:?xt=urn:btih:x", "hash": "x", "status": "cached"}"#,
        )
        .unwrap();
        assert_eq!(item.status, MagnetStatus::Cached);
        assert!(item.files.is_empty());
    }
}
