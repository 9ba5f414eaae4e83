//! File path utilities for the on-disk page cache.
//!
//! Layout under the cache root:
//! - `anime/<id>`: raw HTML of anime detail pages
//! - `manga/<id>`: raw HTML of manga detail pages
//! - `users/<username>`: raw XML of user list exports

use crate::models::MediaKind;
use std::path::{Path, PathBuf};

/// File path manager for cached pages
#[derive(Debug, Clone)]
pub struct CachePaths {
    root: PathBuf,
}

impl CachePaths {
    /// Create a new CachePaths with the given cache root
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    /// Get the cache root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    // ========== Media pages ==========

    /// Get the directory holding pages of one media kind
    pub fn media_dir(&self, kind: MediaKind) -> PathBuf {
        self.root.join(kind.as_str())
    }

    /// Get the cache file of a detail page
    pub fn media_file(&self, kind: MediaKind, mal_id: u32) -> PathBuf {
        self.media_dir(kind).join(mal_id.to_string())
    }

    // ========== User lists ==========

    /// Get the directory holding user list exports
    pub fn users_dir(&self) -> PathBuf {
        self.root.join("users")
    }

    /// Get the cache file of a user's list
    pub fn user_file(&self, username: &str) -> PathBuf {
        self.users_dir().join(Self::username_to_filename(username))
    }

    // ========== Utility Methods ==========

    /// All bucket directories, in a fixed order
    pub fn bucket_dirs(&self) -> [PathBuf; 3] {
        [
            self.media_dir(MediaKind::Anime),
            self.media_dir(MediaKind::Manga),
            self.users_dir(),
        ]
    }

    /// Create all necessary directories
    pub fn create_dirs(&self) -> std::io::Result<()> {
        for dir in self.bucket_dirs() {
            std::fs::create_dir_all(&dir)?;
        }

        Ok(())
    }

    /// Make a username safe to use as a file name.
    ///
    /// Site usernames are plain ASCII; only path separators and characters
    /// rejected by common filesystems are replaced.
    pub fn username_to_filename(username: &str) -> String {
        let safe = username.replace(['/', '\\', ':', '*', '?', '"', '<', '>', '|'], "_");
        match safe.as_str() {
            "" | "." | ".." => format!("_{}", safe),
            _ => safe,
        }
    }
}
