//! AList HTTP API types
//!
//! Serde models for the JSON envelope and payloads returned by the AList
//! v3 REST API. Fields the server omits (or sends as `null`) default, so
//! older servers stay deserializable.

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

/// Generic AList API response envelope.
///
/// Every JSON endpoint answers `{code, message, data}`; `data` is `null`
/// on failure.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub code: u64,
    pub message: String,
    pub data: Option<T>,
}

/// Login response data.
#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
}

/// File/folder information from `/api/fs/get`.
#[derive(Debug, Clone, Deserialize)]
pub struct FsGetData {
    pub name: String,
    pub size: u64,
    #[serde(rename = "is_dir")]
    pub is_dir: bool,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub created: String,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(rename = "type", default)]
    pub r#type: u64,
    #[serde(default)]
    pub raw_url: String,
    #[serde(default)]
    pub readme: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub provider: String,
    #[serde(default)]
    pub related: Option<Vec<FsGetRelated>>,
}

impl FsGetData {
    /// Modification time parsed from the server's RFC 3339 string.
    #[must_use]
    pub fn modified_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.modified).ok()
    }

    /// Creation time parsed from the server's RFC 3339 string.
    #[must_use]
    pub fn created_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.created).ok()
    }
}

/// Sibling entry related to a `/api/fs/get` result.
#[derive(Debug, Clone, Deserialize)]
pub struct FsGetRelated {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "is_dir", default)]
    pub is_dir: bool,
    #[serde(default)]
    pub sign: String,
}

/// Directory listing from `/api/fs/list`.
///
/// `content` is `null` for an empty directory.
#[derive(Debug, Deserialize)]
pub struct FsListData {
    #[serde(default)]
    pub content: Option<Vec<FsListItem>>,
    #[serde(default)]
    pub total: u64,
    #[serde(default)]
    pub readme: String,
    #[serde(default)]
    pub write: bool,
    #[serde(default)]
    pub provider: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FsListItem {
    pub name: String,
    #[serde(default)]
    pub size: u64,
    #[serde(rename = "is_dir")]
    pub is_dir: bool,
    #[serde(default)]
    pub modified: String,
    #[serde(default)]
    pub sign: String,
    #[serde(default)]
    pub thumb: String,
    #[serde(rename = "type", default)]
    pub r#type: u64,
}

/// One record yielded by a directory listing: the entry's full path and
/// whether it is a directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub path: String,
    pub is_dir: bool,
}

/// Current user information from `/api/me`.
#[derive(Debug, Clone, Deserialize)]
pub struct Me {
    pub id: u64,
    pub username: String,
    #[serde(rename = "base_path", default)]
    pub base_path: String,
    #[serde(default)]
    pub role: u64,
    #[serde(default)]
    pub disabled: bool,
    #[serde(default)]
    pub permission: u64,
    #[serde(rename = "sso_id", default)]
    pub sso_id: String,
    #[serde(default)]
    pub otp: bool,
}

/// A folder, as returned by opening a directory path.
///
/// Plain metadata value; holds no connection and needs no release.
#[derive(Debug, Clone)]
pub struct AListFolder {
    pub path: String,
    pub size: u64,
    pub provider: String,
    pub modified: String,
    pub created: String,
    pub raw: FsGetData,
}

impl AListFolder {
    #[must_use]
    pub fn new(path: impl Into<String>, raw: FsGetData) -> Self {
        Self {
            path: path.into(),
            size: raw.size,
            provider: raw.provider.clone(),
            modified: raw.modified.clone(),
            created: raw.created.clone(),
            raw,
        }
    }

    /// Modification time parsed from the server's RFC 3339 string.
    #[must_use]
    pub fn modified_time(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.modified).ok()
    }
}

impl std::fmt::Display for AListFolder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.path)
    }
}

/// Paged envelope used by the admin list endpoints.
#[derive(Debug, Deserialize)]
pub struct PageData<T> {
    #[serde(default)]
    pub content: Option<Vec<T>>,
    #[serde(default)]
    pub total: u64,
}

/// A server account, as managed through `/api/admin/user`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    pub id: u64,
    pub username: String,
    /// Only meaningful when creating or updating; the server never returns
    /// a usable value here.
    pub password: String,
    pub base_path: String,
    pub role: u64,
    pub disabled: bool,
    pub permission: u64,
    pub sso_id: String,
    pub otp: bool,
}

/// A storage mount, as managed through `/api/admin/storage`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Storage {
    pub id: u64,
    pub mount_path: String,
    pub order: i64,
    pub driver: String,
    pub cache_expiration: i64,
    pub status: String,
    /// Driver-specific configuration, JSON-encoded by the server.
    pub addition: String,
    pub remark: String,
    pub modified: String,
    pub disabled: bool,
    pub enable_sign: bool,
}

/// Per-path metadata, as managed through `/api/admin/meta`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Meta {
    pub id: u64,
    pub path: String,
    pub password: String,
    pub p_sub: bool,
    pub write: bool,
    pub w_sub: bool,
    pub hide: String,
    pub h_sub: bool,
    pub readme: String,
    pub r_sub: bool,
    pub header: String,
    pub header_sub: bool,
}
