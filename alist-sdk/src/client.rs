//! AList HTTP client
//!
//! Async client for the AList v3 API: authentication, filesystem
//! operations, and the entry points used by the blocking façade.

use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::json;
use url::Url;

use crate::error::{check_response, json_with_limit, AListError};
use crate::file::AListFile;
use crate::types::{AListFolder, ApiResponse, DirEntry, FsGetData, FsListData, LoginData, Me};
use crate::user::AListUser;
use crate::utils::{join_path, split_path};

/// Shared HTTP client for all AList API requests (connection pooling).
/// Redirects are refused: API endpoints answer in place, and following a
/// server-supplied Location from an authenticated call invites SSRF.
static SHARED_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(30))
        .pool_max_idle_per_host(10)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to build AList shared HTTP client")
});

/// Client for signed-URL and ranged downloads. Unlike the API client it
/// follows redirects, since raw URLs routinely bounce through the
/// storage provider, and carries no overall timeout so large transfers
/// are not cut off.
static DOWNLOAD_CLIENT: LazyLock<Client> = LazyLock::new(|| {
    Client::builder()
        .connect_timeout(Duration::from_secs(10))
        .pool_max_idle_per_host(10)
        .build()
        .expect("Failed to build AList download HTTP client")
});

/// Clone of the pooled download client, for file handles and the ranged
/// downloader.
pub(crate) fn download_client() -> Client {
    DOWNLOAD_CLIENT.clone()
}

const SDK_USER_AGENT: &str = concat!("alist-sdk/", env!("CARGO_PKG_VERSION"));

/// Characters escaped in the `File-Path` upload header; `/` and the
/// usual unreserved marks stay literal.
const FILE_PATH_ESCAPE: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'_')
    .remove(b'.')
    .remove(b'-')
    .remove(b'~');

/// Options for [`AList::list_dir_with`].
#[derive(Debug, Clone)]
pub struct ListDirOptions {
    /// Page number (1-indexed).
    pub page: u64,
    /// Items per page.
    pub per_page: u64,
    /// Ask the server to bypass its listing cache.
    pub refresh: bool,
    /// Password for protected directories.
    pub password: String,
}

impl Default for ListDirOptions {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
            refresh: false,
            password: String::new(),
        }
    }
}

/// Result of opening a path: a downloadable file handle or a plain
/// folder value.
#[derive(Debug)]
pub enum Entry {
    File(AListFile),
    Folder(AListFolder),
}

impl Entry {
    #[must_use]
    pub fn is_dir(&self) -> bool {
        matches!(self, Self::Folder(_))
    }

    #[must_use]
    pub fn path(&self) -> &str {
        match self {
            Self::File(file) => file.path(),
            Self::Folder(folder) => &folder.path,
        }
    }

    #[must_use]
    pub fn into_file(self) -> Option<AListFile> {
        match self {
            Self::File(file) => Some(file),
            Self::Folder(_) => None,
        }
    }

    #[must_use]
    pub fn into_folder(self) -> Option<AListFolder> {
        match self {
            Self::Folder(folder) => Some(folder),
            Self::File(_) => None,
        }
    }
}

/// AList API client.
///
/// Holds the endpoint and, once logged in, the authorization token used
/// by every subsequent call.
///
/// # Example
///
/// ```no_run
/// use alist_sdk::{AList, AListUser};
///
/// # async fn example() -> Result<(), alist_sdk::AListError> {
/// let mut client = AList::new("https://alist.example.com")?;
/// client.login(&AListUser::new("admin", "123456")).await?;
/// for entry in client.list_dir("/").await? {
///     println!("{} (dir: {})", entry.path, entry.is_dir);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct AList {
    endpoint: String,
    token: Option<String>,
    client: Client,
}

impl AList {
    /// Create a new client for `endpoint` (reuses the shared connection
    /// pool).
    ///
    /// The endpoint must be an absolute `http`/`https` URL; a trailing
    /// slash is stripped.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AListError> {
        let endpoint = endpoint.into();
        let parsed = Url::parse(&endpoint)
            .map_err(|e| AListError::InvalidConfig(format!("invalid endpoint {endpoint}: {e}")))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(AListError::InvalidConfig(format!(
                "endpoint {endpoint} is not an http(s) url"
            )));
        }
        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            token: None,
            client: SHARED_CLIENT.clone(),
        })
    }

    /// Create a new client with an existing authorization token.
    pub fn with_token(
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, AListError> {
        let mut client = Self::new(endpoint)?;
        client.token = Some(token.into());
        Ok(client)
    }

    /// Endpoint this client talks to, without trailing slash.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current authorization token, if logged in.
    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.token.is_some()
    }

    /// Replace the authorization token.
    pub fn set_token(&mut self, token: impl Into<String>) {
        self.token = Some(token.into());
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn build_headers(&self) -> Result<HeaderMap, AListError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));
        if let Some(ref token) = self.token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(token)?);
        }
        Ok(headers)
    }

    /// POST a JSON body to an API path and unwrap the response envelope.
    pub(crate) async fn post_api<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<Option<T>, AListError> {
        let url = self.api_url(path);
        tracing::debug!(%url, "alist api request");
        let response = self
            .client
            .post(&url)
            .headers(self.build_headers()?)
            .json(body)
            .send()
            .await?;

        let response = check_response(response)?;
        let resp: ApiResponse<T> = json_with_limit(response).await?;
        if resp.code != 200 {
            return Err(AListError::Api {
                code: resp.code,
                message: resp.message,
            });
        }
        Ok(resp.data)
    }

    /// GET an API path and unwrap the response envelope.
    pub(crate) async fn get_api<T: DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<Option<T>, AListError> {
        let url = self.api_url(path);
        tracing::debug!(%url, "alist api request");
        let response = self
            .client
            .get(&url)
            .headers(self.build_headers()?)
            .send()
            .await?;

        let response = check_response(response)?;
        let resp: ApiResponse<T> = json_with_limit(response).await?;
        if resp.code != 200 {
            return Err(AListError::Api {
                code: resp.code,
                message: resp.message,
            });
        }
        Ok(resp.data)
    }

    pub(crate) fn require_data<T>(data: Option<T>, what: &str) -> Result<T, AListError> {
        data.ok_or_else(|| AListError::Parse(format!("missing data in {what} response")))
    }

    /// Check whether the server is reachable.
    ///
    /// True iff `/ping` answers `pong`.
    pub async fn ping(&self) -> Result<bool, AListError> {
        let url = self.api_url("/ping");
        let response = self.client.get(&url).send().await?;
        let response = check_response(response)?;
        let body = response.text().await?;
        Ok(body.trim() == "pong")
    }

    /// Log in with hashed credentials and store the returned token.
    ///
    /// Fails with [`AListError::Auth`] when the server rejects the
    /// credentials.
    pub async fn login(&mut self, user: &AListUser) -> Result<(), AListError> {
        self.login_impl(user, None).await
    }

    /// Log in with hashed credentials plus a one-time password.
    pub async fn login_with_otp(
        &mut self,
        user: &AListUser,
        otp_code: &str,
    ) -> Result<(), AListError> {
        self.login_impl(user, Some(otp_code)).await
    }

    async fn login_impl(
        &mut self,
        user: &AListUser,
        otp_code: Option<&str>,
    ) -> Result<(), AListError> {
        let body = json!({
            "username": user.username(),
            "password": user.password_hash(),
            "otp_code": otp_code,
        });
        let data: Option<LoginData> = self
            .post_api("/api/auth/login/hash", &body)
            .await
            .map_err(|e| match e {
                AListError::Api { message, .. } => AListError::Auth(message),
                other => other,
            })?;
        let token = Self::require_data(data, "login")?.token;
        self.set_token(token);
        Ok(())
    }

    /// Get information about the currently logged-in user.
    pub async fn me(&self) -> Result<Me, AListError> {
        let data: Option<Me> = self.get_api("/api/me").await?;
        Self::require_data(data, "me")
    }

    /// List a directory with default options.
    pub async fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, AListError> {
        self.list_dir_with(path, &ListDirOptions::default()).await
    }

    /// List a directory.
    ///
    /// Each returned entry carries the full path of the child joined onto
    /// `path`.
    pub async fn list_dir_with(
        &self,
        path: &str,
        options: &ListDirOptions,
    ) -> Result<Vec<DirEntry>, AListError> {
        let body = json!({
            "path": path,
            "password": options.password,
            "page": options.page,
            "per_page": options.per_page,
            "refresh": options.refresh,
        });
        let data: Option<FsListData> = self.post_api("/api/fs/list", &body).await?;
        let data = Self::require_data(data, "fs list")?;
        Ok(data
            .content
            .unwrap_or_default()
            .into_iter()
            .map(|item| DirEntry {
                path: join_path(path, &item.name),
                is_dir: item.is_dir,
            })
            .collect())
    }

    /// Open a path: a file comes back as a downloadable [`AListFile`]
    /// handle, a directory as a plain [`AListFolder`] value.
    pub async fn open(&self, path: &str, password: Option<&str>) -> Result<Entry, AListError> {
        let body = json!({
            "path": path,
            "password": password.unwrap_or(""),
        });
        let data: Option<FsGetData> = self.post_api("/api/fs/get", &body).await?;
        let data = Self::require_data(data, "fs get")?;
        if data.is_dir {
            Ok(Entry::Folder(AListFolder::new(path, data)))
        } else {
            Ok(Entry::File(AListFile::from_fs_get(path, data)))
        }
    }

    /// Create a directory (and any missing parents).
    pub async fn mkdir(&self, path: &str) -> Result<(), AListError> {
        let body = json!({ "path": path });
        self.post_api::<serde_json::Value>("/api/fs/mkdir", &body).await?;
        Ok(())
    }

    /// Upload a local file to `remote`.
    pub async fn upload(
        &self,
        local: impl AsRef<Path>,
        remote: &str,
    ) -> Result<(), AListError> {
        let bytes = tokio::fs::read(local).await?;
        let file_path = utf8_percent_encode(remote, FILE_PATH_ESCAPE).to_string();
        let url = self.api_url("/api/fs/put");
        tracing::debug!(%url, remote, size = bytes.len(), "alist upload");

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(SDK_USER_AGENT));
        if let Some(ref token) = self.token {
            headers.insert(AUTHORIZATION, HeaderValue::from_str(token)?);
        }
        headers.insert("File-Path", HeaderValue::from_str(&file_path)?);

        let response = self
            .client
            .put(&url)
            .headers(headers)
            .body(bytes)
            .send()
            .await?;
        let response = check_response(response)?;
        let resp: ApiResponse<serde_json::Value> = json_with_limit(response).await?;
        if resp.code != 200 {
            return Err(AListError::Api {
                code: resp.code,
                message: resp.message,
            });
        }
        Ok(())
    }

    /// Rename the object at `path` to `new_name` (same directory).
    pub async fn rename(&self, path: &str, new_name: &str) -> Result<(), AListError> {
        let body = json!({
            "path": path,
            "name": new_name,
        });
        self.post_api::<serde_json::Value>("/api/fs/rename", &body).await?;
        Ok(())
    }

    /// Remove a file or directory.
    pub async fn remove(&self, path: &str) -> Result<(), AListError> {
        let (dir, name) = split_path(path);
        let body = json!({
            "names": [name],
            "dir": dir,
        });
        self.post_api::<serde_json::Value>("/api/fs/remove", &body).await?;
        Ok(())
    }

    /// Remove an empty directory.
    pub async fn remove_empty_directory(&self, path: &str) -> Result<(), AListError> {
        let body = json!({ "src_dir": path });
        self.post_api::<serde_json::Value>("/api/fs/remove_empty_directory", &body)
            .await?;
        Ok(())
    }

    /// Copy `src` into the directory `dst_dir`.
    pub async fn copy(&self, src: &str, dst_dir: &str) -> Result<(), AListError> {
        let (src_dir, name) = split_path(src);
        let body = json!({
            "src_dir": src_dir,
            "dst_dir": dst_dir,
            "names": [name],
        });
        self.post_api::<serde_json::Value>("/api/fs/copy", &body).await?;
        Ok(())
    }

    /// Move `src` into the directory `dst_dir`.
    pub async fn move_to(&self, src: &str, dst_dir: &str) -> Result<(), AListError> {
        let (src_dir, name) = split_path(src);
        let body = json!({
            "src_dir": src_dir,
            "dst_dir": dst_dir,
            "names": [name],
        });
        self.post_api::<serde_json::Value>("/api/fs/move", &body).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AList::new("https://alist.example.com").unwrap();
        assert_eq!(client.endpoint(), "https://alist.example.com");
        assert!(!client.has_token());

        let with_token = AList::with_token("https://alist.example.com", "tok").unwrap();
        assert!(with_token.has_token());
        assert_eq!(with_token.token(), Some("tok"));
    }

    #[test]
    fn test_client_rejects_bad_endpoint() {
        assert!(matches!(
            AList::new("111"),
            Err(AListError::InvalidConfig(_))
        ));
        assert!(matches!(
            AList::new("ftp://alist.example.com"),
            Err(AListError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_client_strips_trailing_slash() {
        let client = AList::new("http://alist.example.com:5244/").unwrap();
        assert_eq!(client.endpoint(), "http://alist.example.com:5244");
        assert_eq!(client.api_url("/api/me"), "http://alist.example.com:5244/api/me");
    }

    #[test]
    fn test_set_token() {
        let mut client = AList::new("https://alist.example.com").unwrap();
        assert!(!client.has_token());
        client.set_token("new_token");
        assert_eq!(client.token(), Some("new_token"));
    }

    #[test]
    fn test_build_headers_with_token() {
        let client = AList::with_token("https://alist.example.com", "tok").unwrap();
        let headers = client.build_headers().unwrap();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "tok");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("alist-sdk/"));
    }

    #[test]
    fn test_list_dir_options_defaults() {
        let options = ListDirOptions::default();
        assert_eq!(options.page, 1);
        assert_eq!(options.per_page, 50);
        assert!(!options.refresh);
        assert!(options.password.is_empty());
    }

    #[test]
    fn test_file_path_escaping() {
        let encoded = utf8_percent_encode("/docs/my file.txt", FILE_PATH_ESCAPE).to_string();
        assert_eq!(encoded, "/docs/my%20file.txt");
    }
}
