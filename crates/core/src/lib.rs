//! bn-core: Core library for the bucket-nav storage navigator
//!
//! This crate provides the backend-independent pieces of bnav, including:
//! - Configuration and profile management
//! - Prefix and path helpers
//! - ObjectStore trait for S3 operations
//! - The bucket contents adapter used by the navigator
//!
//! This crate is designed to be independent of any specific S3 SDK,
//! allowing for easy testing and potential future support for other backends.

pub mod config;
pub mod contents;
pub mod error;
pub mod path;
pub mod profile;
pub mod traits;

pub use config::{Config, ConfigManager, ConfigMode};
pub use contents::{BucketContents, DirectoryContents, FileEntry, NavItem};
pub use error::{Error, Result};
pub use path::{RemotePath, parse_target};
pub use profile::{BucketEntry, BucketRef, Profile, ProfileManager};
pub use traits::{ListOptions, ListResult, ObjectInfo, ObjectStore};
