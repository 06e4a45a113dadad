//! Bucket contents adapter
//!
//! Turns raw backend listings into the folder/file view the navigator shows,
//! and wraps the per-item operations (download, upload, delete, create folder)
//! so that their failures land in the navigator's error taxonomy.

use std::path::Path;

use crate::error::{Error, Result};
use crate::path::{DELIMITER, RemotePath};
use crate::profile::BucketRef;
use crate::traits::{ListOptions, ObjectInfo, ObjectStore};

/// Keys requested per listing page and deleted per batch
const PAGE_SIZE: usize = 1000;

/// A file directly under the listed prefix
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Full object key
    pub path: String,
    /// Object size
    pub size_bytes: u64,
}

/// One navigable entry of a folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavItem {
    /// A sub-folder; the prefix always ends with the delimiter
    Folder { prefix: String },
    /// An object; the path never ends with the delimiter
    File { path: String, size_bytes: u64 },
}

impl NavItem {
    /// Full key or prefix of the entry
    pub fn key(&self) -> &str {
        match self {
            NavItem::Folder { prefix } => prefix,
            NavItem::File { path, .. } => path,
        }
    }

    /// Whether the entry is a folder
    pub fn is_folder(&self) -> bool {
        matches!(self, NavItem::Folder { .. })
    }

    /// "folder" or "file", for messages
    pub fn kind(&self) -> &'static str {
        match self {
            NavItem::Folder { .. } => "folder",
            NavItem::File { .. } => "file",
        }
    }
}

/// Folders and files directly under one prefix, in backend order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryContents {
    /// Sub-folder prefixes
    pub folders: Vec<String>,
    /// Files
    pub files: Vec<FileEntry>,
}

impl DirectoryContents {
    /// Normalize listed objects for `prefix`
    ///
    /// Entries outside the prefix and the folder's own marker object are
    /// dropped; everything else keeps the order the backend returned.
    pub fn from_listing(prefix: &str, items: impl IntoIterator<Item = ObjectInfo>) -> Self {
        let mut contents = Self::default();

        for item in items {
            if !item.key.starts_with(prefix) || item.key == prefix {
                continue;
            }

            if item.is_dir {
                if item.key.ends_with(DELIMITER) {
                    contents.folders.push(item.key);
                }
            } else if !item.key.ends_with(DELIMITER) {
                contents.files.push(FileEntry {
                    size_bytes: item.size_bytes.unwrap_or(0),
                    path: item.key,
                });
            }
        }

        contents
    }

    /// All entries, folders before files
    pub fn items(&self) -> impl Iterator<Item = NavItem> + '_ {
        let folders = self.folders.iter().map(|prefix| NavItem::Folder {
            prefix: prefix.clone(),
        });
        let files = self.files.iter().map(|file| NavItem::File {
            path: file.path.clone(),
            size_bytes: file.size_bytes,
        });
        folders.chain(files)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.folders.len() + self.files.len()
    }

    /// Whether the folder has no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// List the buckets the backend exposes
pub async fn backend_buckets<S: ObjectStore + ?Sized>(store: &S) -> Result<Vec<BucketRef>> {
    let buckets = store
        .list_buckets()
        .await
        .map_err(|e| Error::Listing(e.to_string()))?;
    Ok(buckets
        .into_iter()
        .map(|b| BucketRef::named(b.key))
        .collect())
}

/// Folder-level view of one bucket
pub struct BucketContents<'a, S: ObjectStore + ?Sized> {
    store: &'a S,
    bucket: String,
}

impl<'a, S: ObjectStore + ?Sized> BucketContents<'a, S> {
    /// Create an adapter for `bucket`
    pub fn new(store: &'a S, bucket: impl Into<String>) -> Self {
        Self {
            store,
            bucket: bucket.into(),
        }
    }

    /// Bucket name
    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    fn remote(&self, key: &str) -> RemotePath {
        RemotePath::new(&self.bucket, key)
    }

    /// List folders and files directly under `prefix`
    pub async fn list(&self, prefix: &str) -> Result<DirectoryContents> {
        let path = self.remote(prefix);
        let mut items = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let options = ListOptions {
                max_keys: Some(PAGE_SIZE as i32),
                continuation_token: continuation_token.take(),
                recursive: false,
            };

            let result = self
                .store
                .list_objects(&path, options)
                .await
                .map_err(|e| Error::Listing(e.to_string()))?;
            items.extend(result.items);

            match result.continuation_token {
                Some(token) if result.truncated => continuation_token = Some(token),
                _ => break,
            }
        }

        let contents = DirectoryContents::from_listing(prefix, items);
        tracing::debug!(
            bucket = %self.bucket,
            prefix,
            folders = contents.folders.len(),
            files = contents.files.len(),
            "listed prefix"
        );
        Ok(contents)
    }

    /// Download `key` to `local`, returning the bytes written
    pub async fn download(&self, key: &str, local: &Path) -> Result<u64> {
        let data = self
            .store
            .get_object(&self.remote(key))
            .await
            .map_err(|e| Error::Transfer(e.to_string()))?;
        let size = data.len() as u64;

        tokio::fs::write(local, &data)
            .await
            .map_err(|e| Error::Transfer(format!("{}: {e}", local.display())))?;

        tracing::debug!(bucket = %self.bucket, key, local = %local.display(), size, "downloaded");
        Ok(size)
    }

    /// Upload the local file to `key`
    pub async fn upload(&self, local: &Path, key: &str) -> Result<ObjectInfo> {
        let data = tokio::fs::read(local)
            .await
            .map_err(|e| Error::Transfer(format!("{}: {e}", local.display())))?;

        let content_type = mime_guess::from_path(local)
            .first()
            .map(|m| m.essence_str().to_string());

        let info = self
            .store
            .put_object(&self.remote(key), data, content_type)
            .await
            .map_err(|e| Error::Transfer(e.to_string()))?;

        tracing::debug!(bucket = %self.bucket, key, local = %local.display(), "uploaded");
        Ok(info)
    }

    /// Delete exactly one object
    pub async fn delete_file(&self, key: &str) -> Result<()> {
        self.store
            .delete_object(&self.remote(key))
            .await
            .map_err(|e| Error::Delete(e.to_string()))
    }

    /// Delete every object under `prefix`, returning how many were removed
    ///
    /// A prefix matching nothing reports zero, same as an empty folder.
    pub async fn delete_folder(&self, prefix: &str) -> Result<usize> {
        let path = self.remote(prefix);
        let mut keys = Vec::new();
        let mut continuation_token: Option<String> = None;

        loop {
            let options = ListOptions {
                max_keys: Some(PAGE_SIZE as i32),
                continuation_token: continuation_token.take(),
                recursive: true,
            };

            let result = self
                .store
                .list_objects(&path, options)
                .await
                .map_err(|e| Error::Delete(e.to_string()))?;
            keys.extend(
                result
                    .items
                    .into_iter()
                    .filter(|item| !item.is_dir && item.key.starts_with(prefix))
                    .map(|item| item.key),
            );

            match result.continuation_token {
                Some(token) if result.truncated => continuation_token = Some(token),
                _ => break,
            }
        }

        let requested = keys.len();
        let mut deleted = 0;
        for chunk in keys.chunks(PAGE_SIZE) {
            let confirmed = self
                .store
                .delete_objects(&self.bucket, chunk.to_vec())
                .await
                .map_err(|e| Error::Delete(e.to_string()))?;
            deleted += confirmed.len();
        }

        if deleted < requested {
            tracing::warn!(bucket = %self.bucket, prefix, deleted, requested, "partial folder delete");
            return Err(Error::Delete(format!(
                "{} of {requested} objects could not be deleted",
                requested - deleted
            )));
        }

        tracing::debug!(bucket = %self.bucket, prefix, deleted, "deleted folder");
        Ok(deleted)
    }

    /// Create a folder marker (a zero-byte object at `prefix`)
    pub async fn create_folder(&self, prefix: &str) -> Result<()> {
        if !prefix.ends_with(DELIMITER) {
            return Err(Error::InvalidPath(format!(
                "Folder prefix must end with {DELIMITER}: {prefix}"
            )));
        }

        self.store
            .put_object(&self.remote(prefix), Vec::new(), None)
            .await
            .map_err(|e| Error::Transfer(e.to_string()))?;
        Ok(())
    }
}
