//! AList admin client
//!
//! [`AListAdmin`] composes an [`AList`] client and adds the
//! `/api/admin` management endpoints: server accounts, storage mounts,
//! and per-path metadata. Authentication and the base filesystem calls
//! delegate to the wrapped client.

use serde_json::json;

use crate::client::AList;
use crate::error::AListError;
use crate::types::{Me, Meta, PageData, Storage, User};
use crate::user::AListUser;

/// Admin API client. The logged-in account must hold the admin role;
/// otherwise every call fails with [`AListError::Api`].
#[derive(Debug, Clone)]
pub struct AListAdmin {
    base: AList,
}

impl AListAdmin {
    /// Create an admin client for `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, AListError> {
        Ok(Self {
            base: AList::new(endpoint)?,
        })
    }

    /// Create an admin client with an existing authorization token.
    pub fn with_token(
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, AListError> {
        Ok(Self {
            base: AList::with_token(endpoint, token)?,
        })
    }

    /// Promote an already-constructed (possibly logged-in) client.
    #[must_use]
    pub const fn from_client(base: AList) -> Self {
        Self { base }
    }

    /// The wrapped filesystem client.
    #[must_use]
    pub const fn base(&self) -> &AList {
        &self.base
    }

    #[must_use]
    pub fn base_mut(&mut self) -> &mut AList {
        &mut self.base
    }

    /// Unwrap back into the plain client.
    #[must_use]
    pub fn into_base(self) -> AList {
        self.base
    }

    pub async fn ping(&self) -> Result<bool, AListError> {
        self.base.ping().await
    }

    pub async fn login(&mut self, user: &AListUser) -> Result<(), AListError> {
        self.base.login(user).await
    }

    pub async fn me(&self) -> Result<Me, AListError> {
        self.base.me().await
    }

    fn page_content<T>(data: Option<PageData<T>>, what: &str) -> Result<Vec<T>, AListError> {
        Ok(AList::require_data(data, what)?.content.unwrap_or_default())
    }

    // Server accounts.

    pub async fn list_users(&self) -> Result<Vec<User>, AListError> {
        let data = self.base.get_api("/api/admin/user/list").await?;
        Self::page_content(data, "admin user list")
    }

    pub async fn get_user(&self, id: u64) -> Result<User, AListError> {
        let data = self
            .base
            .get_api(&format!("/api/admin/user/get?id={id}"))
            .await?;
        AList::require_data(data, "admin user get")
    }

    pub async fn create_user(&self, user: &User) -> Result<(), AListError> {
        let body = serde_json::to_value(user)?;
        self.base
            .post_api::<serde_json::Value>("/api/admin/user/create", &body)
            .await?;
        Ok(())
    }

    /// Update a user record; `user.id` selects the account.
    pub async fn update_user(&self, user: &User) -> Result<(), AListError> {
        let body = serde_json::to_value(user)?;
        self.base
            .post_api::<serde_json::Value>("/api/admin/user/update", &body)
            .await?;
        Ok(())
    }

    pub async fn delete_user(&self, id: u64) -> Result<(), AListError> {
        self.base
            .post_api::<serde_json::Value>(&format!("/api/admin/user/delete?id={id}"), &json!({}))
            .await?;
        Ok(())
    }

    // Storage mounts.

    pub async fn list_storages(&self) -> Result<Vec<Storage>, AListError> {
        let data = self.base.get_api("/api/admin/storage/list").await?;
        Self::page_content(data, "admin storage list")
    }

    pub async fn get_storage(&self, id: u64) -> Result<Storage, AListError> {
        let data = self
            .base
            .get_api(&format!("/api/admin/storage/get?id={id}"))
            .await?;
        AList::require_data(data, "admin storage get")
    }

    pub async fn create_storage(&self, storage: &Storage) -> Result<(), AListError> {
        let body = serde_json::to_value(storage)?;
        self.base
            .post_api::<serde_json::Value>("/api/admin/storage/create", &body)
            .await?;
        Ok(())
    }

    pub async fn enable_storage(&self, id: u64) -> Result<(), AListError> {
        self.base
            .post_api::<serde_json::Value>(
                &format!("/api/admin/storage/enable?id={id}"),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    pub async fn disable_storage(&self, id: u64) -> Result<(), AListError> {
        self.base
            .post_api::<serde_json::Value>(
                &format!("/api/admin/storage/disable?id={id}"),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    pub async fn delete_storage(&self, id: u64) -> Result<(), AListError> {
        self.base
            .post_api::<serde_json::Value>(
                &format!("/api/admin/storage/delete?id={id}"),
                &json!({}),
            )
            .await?;
        Ok(())
    }

    // Per-path metadata.

    pub async fn list_metas(&self) -> Result<Vec<Meta>, AListError> {
        let data = self.base.get_api("/api/admin/meta/list").await?;
        Self::page_content(data, "admin meta list")
    }

    pub async fn get_meta(&self, id: u64) -> Result<Meta, AListError> {
        let data = self
            .base
            .get_api(&format!("/api/admin/meta/get?id={id}"))
            .await?;
        AList::require_data(data, "admin meta get")
    }

    pub async fn create_meta(&self, meta: &Meta) -> Result<(), AListError> {
        let body = serde_json::to_value(meta)?;
        self.base
            .post_api::<serde_json::Value>("/api/admin/meta/create", &body)
            .await?;
        Ok(())
    }

    pub async fn update_meta(&self, meta: &Meta) -> Result<(), AListError> {
        let body = serde_json::to_value(meta)?;
        self.base
            .post_api::<serde_json::Value>("/api/admin/meta/update", &body)
            .await?;
        Ok(())
    }

    pub async fn delete_meta(&self, id: u64) -> Result<(), AListError> {
        self.base
            .post_api::<serde_json::Value>(&format!("/api/admin/meta/delete?id={id}"), &json!({}))
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_admin_wraps_client() {
        let admin = AListAdmin::new("https://alist.example.com").unwrap();
        assert_eq!(admin.base().endpoint(), "https://alist.example.com");
        assert!(!admin.base().has_token());
    }

    #[test]
    fn test_from_client_keeps_token() {
        let client = AList::with_token("https://alist.example.com", "tok").unwrap();
        let admin = AListAdmin::from_client(client);
        assert_eq!(admin.base().token(), Some("tok"));
        let back = admin.into_base();
        assert_eq!(back.token(), Some("tok"));
    }

    #[test]
    fn test_page_content_defaults_empty() {
        let page: PageData<User> = serde_json::from_str(r#"{"content": null, "total": 0}"#).unwrap();
        let users = AListAdmin::page_content(Some(page), "admin user list").unwrap();
        assert!(users.is_empty());
    }
}
