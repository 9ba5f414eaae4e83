//! Fetch cache for MyAnimeList pages.
//!
//! Pages are kept on disk, one file per key, and reused until they are older
//! than the flush time. An in-memory layer avoids re-reading files within a
//! run. Stale or missing entries are fetched and written back before being
//! returned.
//!
//! Pages are written to a temporary file in the bucket directory and renamed
//! into place, so a reader sees either the previous page or the new one.
//! The read-check-fetch-write sequence takes no locks. Two processes (or two
//! caches sharing a directory) working on the same key may fetch twice.

use crate::api::MalClient;
use crate::clock::Clock;
use crate::error::Result;
use shared::{CachePaths, MediaKind};
use std::collections::HashMap;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::rc::Rc;
use std::time::{Duration, SystemTime};
use tracing::{debug, info};

/// Default freshness window: one day
pub const DEFAULT_FLUSH_TIME: Duration = Duration::from_secs(86400);

/// Name prefix of in-flight writes; such files are never cache entries
const PARTIAL_PREFIX: &str = ".partial-";

/// Key of a cached page
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheKey {
    /// Detail page of an anime or manga
    Media { kind: MediaKind, mal_id: u32 },
    /// Full list export of a user
    User(String),
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheKey::Media { kind, mal_id } => write!(f, "{}:{}", kind, mal_id),
            CacheKey::User(username) => write!(f, "user:{}", username),
        }
    }
}

/// Cached page content with the modification time of its file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry {
    pub content: String,
    pub last_modified: SystemTime,
}

/// Cache statistics
#[derive(Debug, Clone, Default)]
pub struct CacheStats {
    pub anime_files: usize,
    pub manga_files: usize,
    pub user_files: usize,
    pub total_size_bytes: u64,
    pub memory_entries: usize,
}

impl CacheStats {
    pub fn total_files(&self) -> usize {
        self.anime_files + self.manga_files + self.user_files
    }
}

/// Disk and memory cache in front of [`MalClient`]
pub struct FetchCache {
    paths: CachePaths,
    client: MalClient,
    clock: Rc<dyn Clock>,
    flush_time: Duration,
    memory: HashMap<CacheKey, CacheEntry>,
}

impl FetchCache {
    /// Create a new cache, creating the bucket directories if needed
    pub fn new(
        paths: CachePaths,
        client: MalClient,
        clock: Rc<dyn Clock>,
        flush_time: Duration,
    ) -> Result<Self> {
        paths.create_dirs()?;
        info!(
            cache_dir = %paths.root().display(),
            flush_time_secs = flush_time.as_secs(),
            "Cache initialized"
        );

        Ok(Self {
            paths,
            client,
            clock,
            flush_time,
            memory: HashMap::new(),
        })
    }

    /// Get the HTML of an anime or manga detail page
    pub fn get(&mut self, kind: MediaKind, mal_id: u32) -> Result<String> {
        self.load(CacheKey::Media { kind, mal_id })
    }

    /// Get the XML list export of a user
    pub fn get_user_list(&mut self, username: &str) -> Result<String> {
        self.load(CacheKey::User(username.to_string()))
    }

    pub fn flush_time(&self) -> Duration {
        self.flush_time
    }

    fn load(&mut self, key: CacheKey) -> Result<String> {
        let path = self.path(&key);

        if let Some(modified) = self.fresh_modified_time(&path)? {
            if let Some(entry) = self.memory.get(&key) {
                if entry.last_modified == modified {
                    debug!(key = %key, "Memory cache hit");
                    return Ok(entry.content.clone());
                }
            }

            let content = std::fs::read_to_string(&path)?;
            debug!(key = %key, path = %path.display(), "Disk cache hit");
            self.remember(key, content.clone(), modified);
            return Ok(content);
        }

        debug!(key = %key, "Cache miss or stale entry");
        let content = match &key {
            CacheKey::Media { kind, mal_id } => self.client.fetch_media(*kind, *mal_id)?,
            CacheKey::User(username) => self.client.fetch_user_list(username)?,
        };

        let modified = self.write(&path, &content)?;
        debug!(key = %key, path = %path.display(), "Cache stored");
        self.remember(key, content.clone(), modified);

        Ok(content)
    }

    fn remember(&mut self, key: CacheKey, content: String, last_modified: SystemTime) {
        self.memory.insert(
            key,
            CacheEntry {
                content,
                last_modified,
            },
        );
    }

    fn path(&self, key: &CacheKey) -> std::path::PathBuf {
        match key {
            CacheKey::Media { kind, mal_id } => self.paths.media_file(*kind, *mal_id),
            CacheKey::User(username) => self.paths.user_file(username),
        }
    }

    /// Modification time of a cache file, or `None` if it is missing or
    /// older than the flush time
    fn fresh_modified_time(&self, path: &Path) -> Result<Option<SystemTime>> {
        let metadata = match std::fs::metadata(path) {
            Ok(metadata) if metadata.is_file() => metadata,
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let modified = metadata.modified()?;
        // A file from the future counts as brand new
        let age = self
            .clock
            .now()
            .duration_since(modified)
            .unwrap_or(Duration::ZERO);

        if age > self.flush_time {
            Ok(None)
        } else {
            Ok(Some(modified))
        }
    }

    /// Write a page and stamp it with the current clock time.
    ///
    /// The existing file is only replaced once the new content is complete
    /// and synced; on failure the temporary file is removed.
    fn write(&self, path: &Path, content: &str) -> Result<SystemTime> {
        let dir = path.parent().ok_or_else(|| {
            std::io::Error::new(ErrorKind::InvalidInput, "cache path has no parent")
        })?;

        let mut tmp = tempfile::Builder::new()
            .prefix(PARTIAL_PREFIX)
            .tempfile_in(dir)?;
        tmp.write_all(content.as_bytes())?;
        tmp.as_file().set_modified(self.clock.now())?;
        tmp.as_file().sync_all()?;

        let file = tmp.persist(path).map_err(|e| e.error)?;
        Ok(file.metadata()?.modified()?)
    }

    /// Load every fresh cached page into memory
    ///
    /// Files in the anime and manga buckets whose names are not numeric ids
    /// are skipped. Returns the number of entries loaded.
    pub fn preload(&mut self) -> Result<usize> {
        let mut loaded = 0;

        for kind in [MediaKind::Anime, MediaKind::Manga] {
            for name in list_file_names(&self.paths.media_dir(kind))? {
                match name.parse::<u32>() {
                    Ok(mal_id) => {
                        if self.preload_key(CacheKey::Media { kind, mal_id })? {
                            loaded += 1;
                        }
                    }
                    Err(_) => debug!(kind = %kind, file = %name, "Skipping unexpected cache file"),
                }
            }
        }

        for name in list_file_names(&self.paths.users_dir())? {
            if self.preload_key(CacheKey::User(name))? {
                loaded += 1;
            }
        }

        info!(entries = loaded, "Cache preloaded");
        Ok(loaded)
    }

    fn preload_key(&mut self, key: CacheKey) -> Result<bool> {
        let path = self.path(&key);
        match self.fresh_modified_time(&path)? {
            Some(modified) => {
                let content = std::fs::read_to_string(&path)?;
                self.remember(key, content, modified);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Remove every cached page, on disk and in memory
    pub fn clear(&mut self) -> Result<()> {
        for dir in self.paths.bucket_dirs() {
            if dir.exists() {
                std::fs::remove_dir_all(&dir)?;
            }
        }
        self.paths.create_dirs()?;
        self.memory.clear();

        info!("Cache cleared");
        Ok(())
    }

    /// Get cache statistics
    pub fn stats(&self) -> Result<CacheStats> {
        let mut stats = CacheStats {
            memory_entries: self.memory.len(),
            ..CacheStats::default()
        };

        let [anime_dir, manga_dir, users_dir] = self.paths.bucket_dirs();
        for (dir, count) in [
            (anime_dir, &mut stats.anime_files),
            (manga_dir, &mut stats.manga_files),
            (users_dir, &mut stats.user_files),
        ] {
            if !dir.exists() {
                continue;
            }
            for entry in std::fs::read_dir(&dir)? {
                let entry = entry?;
                if is_partial(&entry.file_name().to_string_lossy()) {
                    continue;
                }
                let metadata = entry.metadata()?;
                if metadata.is_file() {
                    *count += 1;
                    stats.total_size_bytes += metadata.len();
                }
            }
        }

        Ok(stats)
    }
}

fn is_partial(name: &str) -> bool {
    name.starts_with(PARTIAL_PREFIX)
}

fn list_file_names(dir: &Path) -> Result<Vec<String>> {
    let mut names = Vec::new();
    if !dir.exists() {
        return Ok(names);
    }

    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().to_string();
        if entry.file_type()?.is_file() && !is_partial(&name) {
            names.push(name);
        }
    }

    Ok(names)
}
