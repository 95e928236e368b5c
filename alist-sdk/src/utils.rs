//! Remote path helpers
//!
//! Server paths are always `/`-separated regardless of the local platform,
//! so these work on strings rather than `std::path::Path`.

/// Join a directory path and an entry name with a single `/`.
#[must_use]
pub fn join_path(base: &str, name: &str) -> String {
    let base = base.trim_end_matches('/');
    let name = name.trim_start_matches('/');
    if base.is_empty() {
        format!("/{name}")
    } else {
        format!("{base}/{name}")
    }
}

/// Split a path into its parent directory and final component.
///
/// `/a/b.txt` -> (`/a`, `b.txt`); `/b.txt` -> (`/`, `b.txt`);
/// the root splits into (`/`, ``).
#[must_use]
pub fn split_path(path: &str) -> (String, String) {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return ("/".to_string(), String::new());
    }
    match trimmed.rsplit_once('/') {
        Some(("", name)) => ("/".to_string(), name.to_string()),
        Some((parent, name)) => (parent.to_string(), name.to_string()),
        None => ("/".to_string(), trimmed.to_string()),
    }
}

/// Parent directory of a path (see [`split_path`]).
#[must_use]
pub fn parent_of(path: &str) -> String {
    split_path(path).0
}

/// Final component of a path (see [`split_path`]).
#[must_use]
pub fn name_of(path: &str) -> String {
    split_path(path).1
}
