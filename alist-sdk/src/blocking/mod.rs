//! Blocking façade
//!
//! Wraps the async client types in [`Blocking<T>`], whose delegation
//! methods drive each async operation to completion through the
//! [`bridge`], from plain synchronous code or from inside a running
//! runtime alike. The wrapper owns its inner value exclusively and
//! converts back to it losslessly, so switching between the async and
//! blocking APIs never copies or rebuilds a client.
//!
//! ```no_run
//! use alist_sdk::{blocking, AListUser};
//!
//! # fn example() -> Result<(), alist_sdk::AListError> {
//! let mut client = blocking::AList::connect("https://alist.example.com")?;
//! client.login(&AListUser::new("admin", "123456"))?;
//! for entry in client.list_dir("/")? {
//!     println!("{}", entry.path);
//! }
//! # Ok(())
//! # }
//! ```

pub mod bridge;

mod client;
mod file;

use crate::types::AListFolder;

/// Blocking wrapper around an async client type.
///
/// `T` is one of the crate's async capability types; which ones have a
/// blocking façade is fixed at compile time by their [`IntoBlocking`]
/// impls, and each gets its delegation methods in an inherent impl
/// block. Use the [`AList`], [`AListAdmin`] and [`AListFile`] aliases.
///
/// The wrapper is exactly as thread-safe as `T`: no internal lock
/// serializes concurrent `&self` calls, and each bridged call gets its
/// own isolated runtime.
pub struct Blocking<T: IntoBlocking> {
    inner: T,
}

/// Marker for async types that have a blocking façade.
///
/// Implementing this for a type is the static registration that
/// `Blocking<T>` exists for it; constructing a wrapper over anything
/// else is a compile error.
pub trait IntoBlocking: Sized {
    /// Wrap `self` in its blocking façade.
    fn into_blocking(self) -> Blocking<Self> {
        Blocking { inner: self }
    }
}

impl<T: IntoBlocking> Blocking<T> {
    /// Wrap an existing async instance.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Unwrap into the async instance. The exact value passed to
    /// [`new`](Blocking::new) comes back; nothing is cloned or rebuilt.
    pub fn into_async(self) -> T {
        self.inner
    }

    /// Borrow the wrapped async instance.
    pub const fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the wrapped async instance.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }
}

impl<T: IntoBlocking> From<T> for Blocking<T> {
    fn from(inner: T) -> Self {
        Self::new(inner)
    }
}

impl<T: IntoBlocking + std::fmt::Debug> std::fmt::Debug for Blocking<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Blocking").field(&self.inner).finish()
    }
}

impl<T: IntoBlocking + Clone> Clone for Blocking<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

/// Blocking AList client; see [`crate::AList`] for the operation set.
pub type AList = Blocking<crate::AList>;

/// Blocking admin client; see [`crate::AListAdmin`].
pub type AListAdmin = Blocking<crate::AListAdmin>;

/// Blocking file handle; see [`crate::AListFile`]. Also implements
/// `std::io::Read` and `std::io::Seek`.
pub type AListFile = Blocking<crate::AListFile>;

/// Result of opening a path through the blocking client: file handles
/// come back pre-wrapped, folders pass through as plain values.
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
