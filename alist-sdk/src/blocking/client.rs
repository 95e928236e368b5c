//! Blocking client delegation
//!
//! Inherent impl blocks fixing `Blocking<T>` to the client types. Every
//! async operation gets a same-named blocking method that routes through
//! [`bridge::block_on`]; plain accessors pass straight through. `open`
//! is the one override with result re-wrapping: a returned file handle
//! is itself wrapped before the caller sees it.

use std::path::Path;

use super::{bridge, Blocking, Entry, IntoBlocking};
use crate::client::ListDirOptions;
use crate::error::AListError;
use crate::types::{DirEntry, Me, Meta, Storage, User};
use crate::user::AListUser;

impl IntoBlocking for crate::AList {}

impl Blocking<crate::AList> {
    /// Construct a fresh client for `endpoint` and wrap it.
    pub fn connect(endpoint: impl Into<String>) -> Result<Self, AListError> {
        Ok(crate::AList::new(endpoint)?.into_blocking())
    }

    /// Construct a fresh client with an existing token and wrap it.
    pub fn connect_with_token(
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, AListError> {
        Ok(crate::AList::with_token(endpoint, token)?.into_blocking())
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.inner.token()
    }

    #[must_use]
    pub const fn has_token(&self) -> bool {
        self.inner.has_token()
    }

    pub fn set_token(&mut self, token: impl Into<String>) {
        self.inner.set_token(token);
    }

    pub fn ping(&self) -> Result<bool, AListError> {
        bridge::block_on(self.inner.ping())
    }

    pub fn login(&mut self, user: &AListUser) -> Result<(), AListError> {
        bridge::block_on(self.inner.login(user))
    }

    pub fn login_with_otp(&mut self, user: &AListUser, otp_code: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.login_with_otp(user, otp_code))
    }

    pub fn me(&self) -> Result<Me, AListError> {
        bridge::block_on(self.inner.me())
    }

    pub fn list_dir(&self, path: &str) -> Result<Vec<DirEntry>, AListError> {
        bridge::block_on(self.inner.list_dir(path))
    }

    pub fn list_dir_with(
        &self,
        path: &str,
        options: &ListDirOptions,
    ) -> Result<Vec<DirEntry>, AListError> {
        bridge::block_on(self.inner.list_dir_with(path, options))
    }

    /// Open a path. Unlike the plain delegations, the result is mapped:
    /// a file handle is re-wrapped in its own blocking façade, a folder
    /// passes through unwrapped.
    pub fn open(&self, path: &str, password: Option<&str>) -> Result<Entry, AListError> {
        match bridge::block_on(self.inner.open(path, password))? {
            crate::Entry::File(file) => Ok(Entry::File(file.into_blocking())),
            crate::Entry::Folder(folder) => Ok(Entry::Folder(folder)),
        }
    }

    pub fn mkdir(&self, path: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.mkdir(path))
    }

    pub fn upload(&self, local: impl AsRef<Path> + Send, remote: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.upload(local, remote))
    }

    pub fn rename(&self, path: &str, new_name: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.rename(path, new_name))
    }

    pub fn remove(&self, path: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.remove(path))
    }

    pub fn remove_empty_directory(&self, path: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.remove_empty_directory(path))
    }

    pub fn copy(&self, src: &str, dst_dir: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.copy(src, dst_dir))
    }

    pub fn move_to(&self, src: &str, dst_dir: &str) -> Result<(), AListError> {
        bridge::block_on(self.inner.move_to(src, dst_dir))
    }
}

impl IntoBlocking for crate::AListAdmin {}

impl Blocking<crate::AListAdmin> {
    /// Construct a fresh admin client for `endpoint` and wrap it.
    pub fn connect(endpoint: impl Into<String>) -> Result<Self, AListError> {
        Ok(crate::AListAdmin::new(endpoint)?.into_blocking())
    }

    pub fn connect_with_token(
        endpoint: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, AListError> {
        Ok(crate::AListAdmin::with_token(endpoint, token)?.into_blocking())
    }

    /// The wrapped filesystem client.
    #[must_use]
    pub const fn base(&self) -> &crate::AList {
        self.inner.base()
    }

    pub fn ping(&self) -> Result<bool, AListError> {
        bridge::block_on(self.inner.ping())
    }

    pub fn login(&mut self, user: &AListUser) -> Result<(), AListError> {
        bridge::block_on(self.inner.login(user))
    }

    pub fn me(&self) -> Result<Me, AListError> {
        bridge::block_on(self.inner.me())
    }

    pub fn list_users(&self) -> Result<Vec<User>, AListError> {
        bridge::block_on(self.inner.list_users())
    }

    pub fn get_user(&self, id: u64) -> Result<User, AListError> {
        bridge::block_on(self.inner.get_user(id))
    }

    pub fn create_user(&self, user: &User) -> Result<(), AListError> {
        bridge::block_on(self.inner.create_user(user))
    }

    pub fn update_user(&self, user: &User) -> Result<(), AListError> {
        bridge::block_on(self.inner.update_user(user))
    }

    pub fn delete_user(&self, id: u64) -> Result<(), AListError> {
        bridge::block_on(self.inner.delete_user(id))
    }

    pub fn list_storages(&self) -> Result<Vec<Storage>, AListError> {
        bridge::block_on(self.inner.list_storages())
    }

    pub fn get_storage(&self, id: u64) -> Result<Storage, AListError> {
        bridge::block_on(self.inner.get_storage(id))
    }

    pub fn create_storage(&self, storage: &Storage) -> Result<(), AListError> {
        bridge::block_on(self.inner.create_storage(storage))
    }

    pub fn enable_storage(&self, id: u64) -> Result<(), AListError> {
        bridge::block_on(self.inner.enable_storage(id))
    }

    pub fn disable_storage(&self, id: u64) -> Result<(), AListError> {
        bridge::block_on(self.inner.disable_storage(id))
    }

    pub fn delete_storage(&self, id: u64) -> Result<(), AListError> {
        bridge::block_on(self.inner.delete_storage(id))
    }

    pub fn list_metas(&self) -> Result<Vec<Meta>, AListError> {
        bridge::block_on(self.inner.list_metas())
    }

    pub fn get_meta(&self, id: u64) -> Result<Meta, AListError> {
        bridge::block_on(self.inner.get_meta(id))
    }

    pub fn create_meta(&self, meta: &Meta) -> Result<(), AListError> {
        bridge::block_on(self.inner.create_meta(meta))
    }

    pub fn update_meta(&self, meta: &Meta) -> Result<(), AListError> {
        bridge::block_on(self.inner.update_meta(meta))
    }

    pub fn delete_meta(&self, id: u64) -> Result<(), AListError> {
        bridge::block_on(self.inner.delete_meta(id))
    }
}
