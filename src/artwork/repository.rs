//! Artwork Repository
//!
//! Loads artwork files from disk and keeps recently used ones in a
//! `SizedLruCache` bounded by total byte count.
//!
//! Cache failures never reach the caller: artwork that cannot be cached
//! is still returned, just not kept.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::cache::{SizeResolver, SizedLruCache};
use crate::config::Config;
use crate::error::Result;
use crate::models::{CacheReport, EntryReport};

/// Raw artwork bytes, shared between the cache and its readers.
pub type Artwork = Arc<Vec<u8>>;

// == Byte Size Resolver ==
/// Sizes artwork by its byte length.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArtworkBytes;

impl SizeResolver<PathBuf, Artwork> for ArtworkBytes {
    fn size_of(&self, _path: &PathBuf, artwork: &Artwork) -> i64 {
        artwork.len() as i64
    }
}

// == Artwork Repository ==
/// Shared, byte-bounded artwork cache.
///
/// Cloning is cheap; clones share the same cache.
#[derive(Debug, Clone)]
pub struct ArtworkRepository {
    cache: Arc<SizedLruCache<PathBuf, Artwork, ArtworkBytes>>,
}

impl ArtworkRepository {
    // == Constructor ==
    /// Creates a repository holding at most `max_bytes` of artwork.
    pub fn new(max_bytes: i64) -> Result<Self> {
        let cache = SizedLruCache::with_size_resolver(max_bytes, ArtworkBytes)?;
        Ok(Self {
            cache: Arc::new(cache),
        })
    }

    /// Creates a repository sized from configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(config.max_bytes)
    }

    // == Load ==
    /// Returns artwork for `path`, reading the file on a cache miss.
    ///
    /// A hit marks the artwork most recently used. A freshly read file is
    /// cached when it fits; otherwise it is returned uncached.
    pub fn load(&self, path: &Path) -> io::Result<Artwork> {
        let key = path.to_path_buf();
        if let Some(artwork) = self.cache.get(&key) {
            debug!(path = %path.display(), "Artwork cache hit");
            return Ok(artwork);
        }

        let artwork: Artwork = Arc::new(fs::read(path)?);
        if let Err(e) = self.cache.put(key, Arc::clone(&artwork)) {
            warn!(path = %path.display(), error = %e, "Serving artwork uncached");
        }
        Ok(artwork)
    }

    // == Warm ==
    /// Caches `path` without disturbing the order of artwork already held.
    ///
    /// Returns `true` if the artwork was newly cached.
    pub fn warm(&self, path: &Path) -> io::Result<bool> {
        let key = path.to_path_buf();
        if self.cache.contains_key(&key) {
            return Ok(false);
        }

        let artwork: Artwork = Arc::new(fs::read(path)?);
        match self.cache.put_if_absent(key, artwork) {
            Ok(existing) => Ok(existing.is_none()),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Skipping artwork");
                Ok(false)
            }
        }
    }

    /// Warms every regular file directly inside `dir`, in file name order.
    ///
    /// Unreadable files are skipped. Returns the number of newly cached files.
    pub fn warm_dir(&self, dir: &Path) -> io::Result<usize> {
        let mut paths: Vec<PathBuf> = fs::read_dir(dir)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .collect();
        paths.sort();

        let mut cached = 0;
        for path in &paths {
            match self.warm(path) {
                Ok(true) => cached += 1,
                Ok(false) => {}
                Err(e) => warn!(path = %path.display(), error = %e, "Failed to read artwork"),
            }
        }

        info!(
            dir = %dir.display(),
            files = paths.len(),
            cached,
            "Warmed artwork cache"
        );
        Ok(cached)
    }

    // == Invalidate ==
    /// Drops cached artwork for `path`, e.g. after the file changed.
    ///
    /// Returns `true` if something was cached.
    pub fn invalidate(&self, path: &Path) -> bool {
        match self.cache.remove(&path.to_path_buf()) {
            Ok(removed) => removed.is_some(),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to invalidate artwork");
                false
            }
        }
    }

    // == Capacity ==
    /// Changes the byte budget, evicting least recently used artwork.
    pub fn resize(&self, max_bytes: i64) -> Result<()> {
        self.cache.resize(max_bytes)?;
        info!(max_bytes, "Resized artwork cache");
        Ok(())
    }

    /// Drops all cached artwork.
    pub fn clear(&self) {
        self.cache.clear();
    }

    // == Report ==
    /// Builds an occupancy report, least recently used artwork first.
    pub fn report(&self) -> CacheReport {
        let entries = self
            .cache
            .snapshot()
            .iter()
            .map(|(path, artwork)| {
                EntryReport::new(
                    path.display().to_string(),
                    ArtworkBytes.size_of(path, artwork),
                )
            })
            .collect();
        CacheReport::new(self.cache.max_size(), entries)
    }

    /// The underlying cache.
    pub fn cache(&self) -> &SizedLruCache<PathBuf, Artwork, ArtworkBytes> {
        &self.cache
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;

    fn write_file(dir: &Path, name: &str, len: usize) -> PathBuf {
        let path = dir.join(name);
        let mut file = File::create(&path).unwrap();
        file.write_all(&vec![0xAB; len]).unwrap();
        path
    }

    #[test]
    fn test_repository_invalid_capacity() {
        assert!(ArtworkRepository::new(0).is_err());
    }

    #[test]
    fn test_load_caches_file() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "cover.jpg", 10);
        let repo = ArtworkRepository::new(100).unwrap();

        let artwork = repo.load(&path).unwrap();
        assert_eq!(artwork.len(), 10);
        assert_eq!(repo.cache().occupied_size(), 10);

        // Served from cache even after the file is gone
        fs::remove_file(&path).unwrap();
        assert_eq!(repo.load(&path).unwrap().len(), 10);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempdir().unwrap();
        let repo = ArtworkRepository::new(100).unwrap();

        assert!(repo.load(&dir.path().join("missing.jpg")).is_err());
        assert!(repo.cache().is_empty());
    }

    #[test]
    fn test_load_too_large_served_uncached() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "huge.png", 150);
        let repo = ArtworkRepository::new(100).unwrap();

        let artwork = repo.load(&path).unwrap();

        assert_eq!(artwork.len(), 150);
        assert!(repo.cache().is_empty());
    }

    #[test]
    fn test_load_evicts_by_bytes() {
        let dir = tempdir().unwrap();
        let a = write_file(dir.path(), "a.jpg", 40);
        let b = write_file(dir.path(), "b.jpg", 40);
        let c = write_file(dir.path(), "c.jpg", 40);
        let repo = ArtworkRepository::new(100).unwrap();

        repo.load(&a).unwrap();
        repo.load(&b).unwrap();
        repo.load(&a).unwrap();
        repo.load(&c).unwrap();

        assert!(repo.cache().contains_key(&a));
        assert!(!repo.cache().contains_key(&b));
        assert_eq!(repo.cache().occupied_size(), 80);
    }

    #[test]
    fn test_warm_dir() {
        let dir = tempdir().unwrap();
        write_file(dir.path(), "b.jpg", 10);
        write_file(dir.path(), "a.jpg", 20);
        write_file(dir.path(), "too_big.jpg", 500);
        std::fs::create_dir(dir.path().join("nested")).unwrap();
        let repo = ArtworkRepository::new(100).unwrap();

        assert_eq!(repo.warm_dir(dir.path()).unwrap(), 2);

        let report = repo.report();
        let keys: Vec<&str> = report
            .entries
            .iter()
            .map(|e| Path::new(&e.key).file_name().unwrap().to_str().unwrap())
            .collect();
        assert_eq!(keys, vec!["a.jpg", "b.jpg"]);
        assert_eq!(report.occupied_size, 30);

        // Second pass finds everything already cached
        assert_eq!(repo.warm_dir(dir.path()).unwrap(), 0);
    }

    #[test]
    fn test_warm_keeps_order() {
        let dir = tempdir().unwrap();
        let a = write_file(dir.path(), "a.jpg", 10);
        let b = write_file(dir.path(), "b.jpg", 10);
        let repo = ArtworkRepository::new(100).unwrap();

        repo.load(&a).unwrap();
        repo.load(&b).unwrap();
        assert!(!repo.warm(&a).unwrap());

        let order: Vec<PathBuf> = repo.cache().snapshot().into_iter().map(|(p, _)| p).collect();
        assert_eq!(order, vec![a, b]);
    }

    #[test]
    fn test_invalidate() {
        let dir = tempdir().unwrap();
        let path = write_file(dir.path(), "cover.jpg", 10);
        let repo = ArtworkRepository::new(100).unwrap();

        repo.load(&path).unwrap();
        assert!(repo.invalidate(&path));
        assert!(!repo.invalidate(&path));
        assert_eq!(repo.cache().occupied_size(), 0);
    }

    #[test]
    fn test_resize_and_clear() {
        let dir = tempdir().unwrap();
        let a = write_file(dir.path(), "a.jpg", 30);
        let b = write_file(dir.path(), "b.jpg", 30);
        let repo = ArtworkRepository::new(100).unwrap();

        repo.load(&a).unwrap();
        repo.load(&b).unwrap();
        repo.resize(40).unwrap();

        let report = repo.report();
        assert_eq!(report.max_size, 40);
        assert_eq!(report.entry_count, 1);
        assert!(repo.cache().contains_key(&b));

        assert!(repo.resize(-1).is_err());
        repo.clear();
        assert!(repo.cache().is_empty());
    }
}
