//! Credential store
//!
//! One JSON file per saved account under the platform user-data
//! directory (`alist3/users`). The default account is marked by a
//! `.__default` filename suffix, so usernames containing the marker are
//! refused outright.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Filename suffix marking the default account.
pub const DEFAULT_MARKER: &str = ".__default";

/// One stored account: credentials plus the endpoint they belong to.
///
/// The password is stored as the salted digest, never in the clear; the
/// digest is all the hashed-login endpoint needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredUser {
    pub username: String,
    pub password_hash: String,
    pub endpoint: String,
    #[serde(default)]
    pub tag: String,
}

impl StoredUser {
    #[must_use]
    pub fn credentials(&self) -> alist_sdk::AListUser {
        alist_sdk::AListUser::from_hash(&self.username, &self.password_hash)
    }
}

/// Directory-backed store of [`StoredUser`] records.
#[derive(Debug)]
pub struct UserStore {
    dir: PathBuf,
}

impl UserStore {
    /// Open the store at the platform default location, creating it if
    /// missing.
    pub fn open_default() -> Result<Self> {
        let base = dirs::data_dir().context("no user data directory on this platform")?;
        Self::at(base.join("alist3").join("users"))
    }

    /// Open a store at an explicit directory (used by tests).
    pub fn at(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .with_context(|| format!("creating credential store at {}", dir.display()))?;
        Ok(Self { dir })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn file_for(&self, username: &str, default: bool) -> PathBuf {
        let marker = if default { DEFAULT_MARKER } else { "" };
        self.dir.join(format!("{username}{marker}.json"))
    }

    /// Whether a record exists for `username`, default-marked or not.
    #[must_use]
    pub fn contains(&self, username: &str) -> bool {
        self.file_for(username, true).exists() || self.file_for(username, false).exists()
    }

    /// Save a record.
    ///
    /// Refuses usernames containing the default marker, and refuses to
    /// overwrite an existing record unless `cover` is set. Saving with
    /// `default` demotes any previously-default account.
    pub fn save(&self, record: &StoredUser, default: bool, cover: bool) -> Result<()> {
        if record.username.contains(DEFAULT_MARKER) {
            bail!("username may not contain the reserved marker {DEFAULT_MARKER:?}");
        }
        if self.contains(&record.username) && !cover {
            bail!(
                "user {:?} already stored; pass --cover to overwrite",
                record.username
            );
        }
        if default {
            self.demote_defaults()?;
        } else {
            // Re-saving a previously-default user without --default drops
            // the marker file.
            let marked = self.file_for(&record.username, true);
            if marked.exists() {
                fs::remove_file(&marked)?;
            }
        }
        // Drop the other variant so exactly one file per user remains.
        let other = self.file_for(&record.username, !default);
        if other.exists() {
            fs::remove_file(&other)?;
        }
        let path = self.file_for(&record.username, default);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
        tracing::debug!(path = %path.display(), default, "stored credentials");
        Ok(())
    }

    /// Strip the default marker from every marked record.
    fn demote_defaults(&self) -> Result<()> {
        for (record, is_default) in self.list()? {
            if is_default {
                let from = self.file_for(&record.username, true);
                let to = self.file_for(&record.username, false);
                fs::rename(from, to)?;
            }
        }
        Ok(())
    }

    /// Remove the record for `username`; true if one existed.
    pub fn remove(&self, username: &str) -> Result<bool> {
        for default in [true, false] {
            let path = self.file_for(username, default);
            if path.exists() {
                fs::remove_file(&path)?;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Load the record for `username`, preferring the default-marked file.
    pub fn get(&self, username: &str) -> Result<Option<StoredUser>> {
        for default in [true, false] {
            let path = self.file_for(username, default);
            if path.exists() {
                return Ok(Some(Self::read_record(&path)?));
            }
        }
        Ok(None)
    }

    /// All records with their default flag, defaults first, then by name.
    pub fn list(&self) -> Result<Vec<(StoredUser, bool)>> {
        let mut records = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let stem = path
                .file_stem()
                .and_then(|s| s.to_str())
                .unwrap_or_default();
            let is_default = stem.ends_with(DEFAULT_MARKER);
            records.push((Self::read_record(&path)?, is_default));
        }
        records.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.username.cmp(&b.0.username)));
        Ok(records)
    }

    fn read_record(path: &Path) -> Result<StoredUser> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&json).with_context(|| format!("parsing {}", path.display()))
    }
}
