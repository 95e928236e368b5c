//! AList user credentials
//!
//! The server's hashed-login endpoint expects a SHA-256 digest of the
//! password concatenated with a fixed upstream salt, so the raw password
//! never needs to be kept or transmitted.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::AListError;

/// Fixed salt appended to passwords before hashing, defined by the AList
/// server for its `/api/auth/login/hash` endpoint.
const PASSWORD_SALT: &[u8] = b"-https://github.com/alist-org/alist";

/// Credentials for an AList account: username plus the salted SHA-256
/// password digest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AListUser {
    username: String,
    password_hash: String,
}

impl AListUser {
    /// Create credentials from a username and raw password.
    ///
    /// The password is digested immediately and not retained.
    pub fn new(username: impl Into<String>, password: &str) -> Self {
        Self {
            username: username.into(),
            password_hash: hash_password(password),
        }
    }

    /// Create credentials from a username and a pre-computed digest, as
    /// read back from a credential store.
    pub fn from_hash(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Parse a `username:password@endpoint` URI into credentials plus the
    /// endpoint.
    ///
    /// The split is on the last `@`, so passwords may contain `@`.
    pub fn from_uri(uri: &str) -> Result<(Self, String), AListError> {
        let (credentials, endpoint) = uri.rsplit_once('@').ok_or_else(|| {
            AListError::InvalidConfig(format!("missing '@' in user uri: {uri}"))
        })?;
        let (username, password) = credentials.split_once(':').ok_or_else(|| {
            AListError::InvalidConfig(format!("missing ':' between username and password: {uri}"))
        })?;
        if username.is_empty() {
            return Err(AListError::InvalidConfig("empty username in user uri".to_string()));
        }
        if endpoint.is_empty() {
            return Err(AListError::InvalidConfig("empty endpoint in user uri".to_string()));
        }
        Ok((Self::new(username, password), endpoint.to_string()))
    }

    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The salted SHA-256 digest sent to the hashed-login endpoint.
    #[must_use]
    pub fn password_hash(&self) -> &str {
        &self.password_hash
    }
}

/// Digest a raw password with the server's fixed salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(PASSWORD_SALT);
    hex::encode(hasher.finalize())
}
