//! Generated-scheme cache keyed by (image, dark mode, variant)
//!
//! Entries remember the image's modification time when they were generated
//! and are only served while the file still has that mtime.

use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};
use std::time::SystemTime;

use area_color::Variant;
use tracing::debug;

use super::scheme::ColorScheme;

pub const DEFAULT_CEILING: usize = 32;

/// Map that forgets its oldest half once it grows past `ceiling`
#[derive(Debug)]
pub struct BoundedMap<K, V> {
    entries: HashMap<K, V>,
    order: VecDeque<K>,
    ceiling: usize,
}

impl<K: Eq + Hash + Clone, V> BoundedMap<K, V> {
    pub fn new(ceiling: usize) -> Self {
        Self {
            entries: HashMap::new(),
            order: VecDeque::new(),
            ceiling,
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert as the newest entry, replacing (and refreshing) any existing one
    pub fn insert(&mut self, key: K, value: V) {
        if self.entries.insert(key.clone(), value).is_some() {
            self.order.retain(|k| k != &key);
        }
        self.order.push_back(key);
        self.trim();
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        let value = self.entries.remove(key)?;
        self.order.retain(|k| k != key);
        Some(value)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    fn trim(&mut self) {
        if self.entries.len() <= self.ceiling {
            return;
        }
        let keep = (self.ceiling / 2).max(1).min(self.ceiling);
        while self.order.len() > keep {
            if let Some(oldest) = self.order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub path: PathBuf,
    pub dark: bool,
    pub variant: Variant,
}

impl CacheKey {
    pub fn new(path: &Path, dark: bool, variant: Variant) -> Self {
        Self {
            path: path.to_path_buf(),
            dark,
            variant,
        }
    }
}

#[derive(Debug)]
struct CachedScheme {
    mtime: SystemTime,
    scheme: ColorScheme,
}

/// Thread-safe scheme cache with mtime validation
#[derive(Debug)]
pub struct ColorCache {
    inner: Mutex<BoundedMap<CacheKey, CachedScheme>>,
}

impl Default for ColorCache {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}

impl ColorCache {
    pub fn new(ceiling: usize) -> Self {
        Self {
            inner: Mutex::new(BoundedMap::new(ceiling)),
        }
    }

    /// Cached scheme, if the image is unchanged since it was generated
    pub fn get(&self, path: &Path, dark: bool, variant: Variant) -> Option<ColorScheme> {
        let key = CacheKey::new(path, dark, variant);
        let mtime = file_mtime(path);
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = inner.get(&key)?;
        if Some(entry.mtime) == mtime {
            debug!("Color cache hit for {:?} (dark={}, {})", path, dark, variant);
            return Some(entry.scheme.clone());
        }
        debug!("Dropping stale color cache entry for {:?}", path);
        inner.remove(&key);
        None
    }

    /// Cache `scheme` under the image's current mtime. Returns false if the
    /// file cannot be stat'ed, in which case nothing is stored.
    pub fn put(&self, path: &Path, dark: bool, variant: Variant, scheme: ColorScheme) -> bool {
        let Some(mtime) = file_mtime(path) else {
            return false;
        };
        self.insert_stamped(CacheKey::new(path, dark, variant), mtime, scheme);
        true
    }

    /// Cache `scheme` under an explicit mtime
    pub fn insert_stamped(&self, key: CacheKey, mtime: SystemTime, scheme: ColorScheme) {
        let mut inner = self.inner.lock().unwrap_or_else(PoisonError::into_inner);
        inner.insert(key, CachedScheme { mtime, scheme });
    }

    pub fn clear(&self) {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner).len()
    }
}

pub fn file_mtime(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn scheme(primary: &str) -> ColorScheme {
        [("primary".to_string(), primary.to_string())].into_iter().collect()
    }

    #[test]
    fn bounded_map_half_trims() {
        let mut map = BoundedMap::new(4);
        for i in 0..5 {
            map.insert(i, i * 10);
        }
        assert_eq!(map.len(), 2);
        assert!(map.contains(&3));
        assert!(map.contains(&4));
        assert!(!map.contains(&0));
    }

    #[test]
    fn bounded_map_reinsert_refreshes() {
        let mut map = BoundedMap::new(4);
        for i in 0..4 {
            map.insert(i, ());
        }
        map.insert(0, ());
        map.insert(9, ());
        assert!(map.contains(&0));
        assert!(map.contains(&9));
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn bounded_map_tiny_ceiling_keeps_newest() {
        let mut map = BoundedMap::new(1);
        map.insert("a", 1);
        map.insert("b", 2);
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&"b"), Some(&2));
    }

    #[test]
    fn put_then_get_hits() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        std::fs::write(&path, b"x").unwrap();

        let cache = ColorCache::new(8);
        assert!(cache.put(&path, false, Variant::TonalSpot, scheme("#111111")));
        assert_eq!(cache.get(&path, false, Variant::TonalSpot), Some(scheme("#111111")));
        assert_eq!(cache.get(&path, true, Variant::TonalSpot), None);
        assert_eq!(cache.get(&path, false, Variant::Vibrant), None);
    }

    #[test]
    fn missing_file_is_not_cached() {
        let cache = ColorCache::new(8);
        let path = Path::new("/nonexistent/wall.png");
        assert!(!cache.put(path, false, Variant::TonalSpot, scheme("#333333")));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn mtime_change_invalidates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        std::fs::write(&path, b"x").unwrap();

        let cache = ColorCache::new(8);
        let key = CacheKey::new(&path, false, Variant::TonalSpot);
        let stale = file_mtime(&path).unwrap() - Duration::from_secs(60);
        cache.insert_stamped(key, stale, scheme("#222222"));
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&path, false, Variant::TonalSpot), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn deleted_file_misses() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wall.png");
        std::fs::write(&path, b"x").unwrap();

        let cache = ColorCache::new(8);
        let mtime = file_mtime(&path).unwrap();
        cache.insert_stamped(CacheKey::new(&path, false, Variant::TonalSpot), mtime, scheme("#333333"));
        std::fs::remove_file(&path).unwrap();
        assert_eq!(file_mtime(&path), None);
        assert_eq!(cache.get(&path, false, Variant::TonalSpot), None);
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn size_never_exceeds_ceiling() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ColorCache::new(6);
        for i in 0..20 {
            let path = dir.path().join(format!("{i}.png"));
            std::fs::write(&path, b"x").unwrap();
            cache.put(&path, i % 2 == 0, Variant::TonalSpot, scheme("#444444"));
            assert!(cache.len() <= 6);
        }
        cache.clear();
        assert_eq!(cache.len(), 0);
    }
}
