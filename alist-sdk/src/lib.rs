//! Client SDK for the [AList](https://github.com/alist-org/alist)
//! file-storage server.
//!
//! The async API is the native one: [`AList`] for authentication and
//! filesystem operations, [`AListAdmin`] for the `/api/admin` endpoints,
//! [`AListFile`] for spooled file downloads, and [`Downloader`] for
//! multi-connection ranged transfers.
//!
//! The [`blocking`] module wraps each of these in a [`blocking::Blocking`]
//! façade whose methods need no runtime from the caller and stay safe
//! when called from inside one.
//!
//! ```no_run
//! use alist_sdk::{AList, AListUser};
//!
//! # async fn example() -> Result<(), alist_sdk::AListError> {
//! let mut client = AList::new("https://alist.example.com")?;
//! client.login(&AListUser::new("admin", "123456")).await?;
//! let entries = client.list_dir("/").await?;
//! # Ok(())
//! # }
//! ```

pub mod admin;
pub mod blocking;
pub mod client;
pub mod download;
pub mod error;
pub mod file;
pub mod types;
pub mod user;
pub mod utils;

pub use admin::AListAdmin;
pub use blocking::IntoBlocking;
pub use client::{AList, Entry, ListDirOptions};
pub use download::{DownloadStats, Downloader};
pub use error::AListError;
pub use file::AListFile;
pub use types::{AListFolder, DirEntry, Me, Meta, PageData, Storage, User};
pub use user::AListUser;
