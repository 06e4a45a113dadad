//! Path parsing and prefix helpers
//!
//! Object keys form a flat namespace; the `/` delimiter folds it into folders.
//! A folder is a prefix that ends with the delimiter, the bucket root is `""`.

use crate::error::{Error, Result};

/// Character that separates folder levels in object keys
pub const DELIMITER: char = '/';

/// A location inside a bucket
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemotePath {
    /// Bucket name
    pub bucket: String,
    /// Object key or prefix (empty for bucket root)
    pub key: String,
}

impl RemotePath {
    /// Create a new RemotePath
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Get the full path as a string (bucket/key)
    pub fn to_full_path(&self) -> String {
        if self.key.is_empty() {
            self.bucket.clone()
        } else {
            format!("{}/{}", self.bucket, self.key)
        }
    }
}

impl std::fmt::Display for RemotePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_full_path())
    }
}

/// Parse a `bucket[/prefix]` target
///
/// The prefix is normalized to folder form, so `media/2024` and `media/2024/`
/// both start at the `2024/` folder.
pub fn parse_target(target: &str) -> Result<RemotePath> {
    let target = target.trim_start_matches(DELIMITER);
    if target.is_empty() {
        return Err(Error::InvalidPath("Path cannot be empty".into()));
    }

    let (bucket, prefix) = match target.split_once(DELIMITER) {
        Some((bucket, rest)) => (bucket, rest.trim_matches(DELIMITER)),
        None => (target, ""),
    };

    if bucket.is_empty() {
        return Err(Error::InvalidPath("Bucket name cannot be empty".into()));
    }

    Ok(RemotePath::new(bucket, folder_prefix(prefix)))
}

/// Normalize a prefix to folder form (`""` stays the root)
pub fn folder_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_matches(DELIMITER);
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("{trimmed}/")
    }
}

/// Name of an entry relative to the folder it is listed in
pub fn relative_name<'a>(full: &'a str, prefix: &str) -> &'a str {
    full.strip_prefix(prefix).unwrap_or(full)
}

/// Last segment of a key or local path, ignoring a trailing delimiter
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches(['/', '\\']);
    trimmed
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(trimmed)
}

/// Every folder prefix from the first level down to `prefix` itself
///
/// `"a/b/"` yields `["a/", "a/b/"]`; the root yields nothing.
pub fn ancestors(prefix: &str) -> Vec<String> {
    let mut current = String::new();
    prefix
        .split(DELIMITER)
        .filter(|segment| !segment.is_empty())
        .map(|segment| {
            current.push_str(segment);
            current.push(DELIMITER);
            current.clone()
        })
        .collect()
}

/// Check a folder name typed by the user
pub fn validate_folder_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(Error::InvalidPath("Folder name cannot be empty".into()));
    }
    if name.contains(DELIMITER) {
        return Err(Error::InvalidPath(format!(
            "Folder name cannot contain {DELIMITER}"
        )));
    }
    Ok(())
}
