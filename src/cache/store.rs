//! Cache Store Module
//!
//! Main cache engine combining an unbounded `lru::LruCache` with
//! size-aware eviction behind a single instance lock.

use std::fmt;
use std::hash::Hash;

use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use crate::cache::{SizeResolver, UnitSize};
use crate::error::{CacheError, Result};

// == Locked State ==
struct Inner<K, V> {
    /// Entries in access order; capacity is enforced by size, not count
    entries: LruCache<K, V>,
    /// Sum of resolved sizes of all held entries
    occupied_size: i64,
    max_size: i64,
}

impl<K: Hash + Eq, V> Inner<K, V> {
    /// Subtracts the size of an entry that just left the map.
    fn release(&mut self, size: i64) {
        self.occupied_size -= size;
        assert!(
            self.occupied_size >= 0,
            "occupied size went negative ({}); size bookkeeping has drifted",
            self.occupied_size
        );
    }
}

// == Sized LRU Cache ==
/// Capacity-bounded key/value store with least-recently-used eviction.
///
/// Capacity is measured by a [`SizeResolver`] rather than by entry count.
/// Every operation runs under one mutex per instance, so the cache can be
/// shared across threads behind an `Arc`.
///
/// The resolver is called while the lock is held and must not call back
/// into the same cache.
///
/// # Example
/// ```
/// use sized_lru::cache::SizedLruCache;
///
/// let cache = SizedLruCache::new(3).unwrap();
/// cache.put("a", 1).unwrap();
/// cache.put("b", 2).unwrap();
/// cache.put("c", 3).unwrap();
/// cache.put("d", 4).unwrap(); // evicts "a"
///
/// assert_eq!(cache.get(&"a"), None);
/// assert_eq!(cache.occupied_size(), 3);
/// ```
pub struct SizedLruCache<K, V, S = UnitSize> {
    inner: Mutex<Inner<K, V>>,
    resolver: S,
}

impl<K, V> SizedLruCache<K, V, UnitSize>
where
    K: Hash + Eq + Clone,
{
    // == Constructor ==
    /// Creates a count-bounded cache: every entry has size 1.
    pub fn new(max_size: i64) -> Result<Self> {
        Self::with_size_resolver(max_size, UnitSize)
    }
}

impl<K, V, S> SizedLruCache<K, V, S>
where
    K: Hash + Eq + Clone,
    S: SizeResolver<K, V>,
{
    /// Creates a cache bounded by the sizes `resolver` assigns to entries.
    ///
    /// Fails with [`CacheError::InvalidCapacity`] if `max_size <= 0`.
    pub fn with_size_resolver(max_size: i64, resolver: S) -> Result<Self> {
        validate_capacity(max_size)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: LruCache::unbounded(),
                occupied_size: 0,
                max_size,
            }),
            resolver,
        })
    }

    // == Put ==
    /// Inserts or replaces the mapping for `key` as most recently used.
    ///
    /// Least recently used entries are evicted until the new entry fits.
    /// Returns the value previously mapped to `key`.
    ///
    /// An entry whose size is `>= max_size` is rejected with
    /// [`CacheError::EntryTooLarge`] and the cache is left untouched.
    pub fn put(&self, key: K, value: V) -> Result<Option<V>> {
        let mut inner = self.inner.lock();
        self.put_locked(&mut inner, key, value)
    }

    // == Put If Absent ==
    /// Inserts `key` only if it is not present yet.
    ///
    /// On a hit the existing value is returned and nothing changes: the
    /// entry keeps its recency position. This lets callers warm the cache
    /// without reordering it. On a miss this behaves like [`put`](Self::put)
    /// and returns `None`.
    pub fn put_if_absent(&self, key: K, value: V) -> Result<Option<V>>
    where
        V: Clone,
    {
        let mut inner = self.inner.lock();
        if let Some(existing) = inner.entries.peek(&key) {
            return Ok(Some(existing.clone()));
        }
        self.put_locked(&mut inner, key, value)
    }

    // == Get ==
    /// Returns the value for `key` and marks it most recently used.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().entries.get(key).cloned()
    }

    // == Peek ==
    /// Returns the value for `key` without changing its recency.
    pub fn peek(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        self.inner.lock().entries.peek(key).cloned()
    }

    /// Checks membership without changing recency.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.lock().entries.contains(key)
    }

    // == Remove ==
    /// Removes the mapping for `key` and returns its value.
    pub fn remove(&self, key: &K) -> Result<Option<V>> {
        let mut inner = self.inner.lock();
        let size = match inner.entries.peek(key) {
            Some(value) => self.resolve(key, value)?,
            None => return Ok(None),
        };
        let removed = inner.entries.pop(key);
        inner.release(size);
        Ok(removed)
    }

    // == Resize ==
    /// Changes the capacity, evicting least recently used entries until
    /// the occupied size fits.
    ///
    /// All evicted sizes are resolved before anything is evicted, so a
    /// failing resolver leaves the cache as it was.
    pub fn resize(&self, max_size: i64) -> Result<()> {
        validate_capacity(max_size)?;
        let mut inner = self.inner.lock();
        let occupied_size = inner.occupied_size;
        let plan = self.plan_eviction(&*inner, occupied_size, max_size, None)?;
        let evicted = evict(&mut *inner, &plan);
        inner.max_size = max_size;
        debug!(
            max_size,
            evicted,
            occupied_size = inner.occupied_size,
            "Resized cache"
        );
        Ok(())
    }

    // == Clear ==
    /// Evicts every entry. The capacity is unchanged.
    pub fn clear(&self) {
        let mut inner = self.inner.lock();
        let evicted = inner.entries.len();
        inner.entries.clear();
        inner.occupied_size = 0;
        debug!(evicted, "Cleared cache");
    }

    // == Snapshot ==
    /// Copies the current entries, least recently used first.
    ///
    /// The returned vector does not alias the cache.
    pub fn snapshot(&self) -> Vec<(K, V)>
    where
        V: Clone,
    {
        self.inner
            .lock()
            .entries
            .iter()
            .rev()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    // == Sizes ==
    /// Sum of the sizes of all held entries.
    pub fn occupied_size(&self) -> i64 {
        self.inner.lock().occupied_size
    }

    pub fn max_size(&self) -> i64 {
        self.inner.lock().max_size
    }

    /// Number of entries, regardless of their sizes.
    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().entries.is_empty()
    }

    /// Size of a candidate entry as the cache would count it.
    pub fn size_of(&self, key: &K, value: &V) -> Result<i64> {
        self.resolve(key, value)
    }

    // == Internals ==

    fn put_locked(&self, inner: &mut Inner<K, V>, key: K, value: V) -> Result<Option<V>> {
        let size = self.resolve(&key, &value)?;
        if size >= inner.max_size {
            return Err(CacheError::EntryTooLarge {
                size,
                max_size: inner.max_size,
            });
        }

        // The replaced entry never counts against room for its replacement.
        let previous_size = match inner.entries.peek(&key) {
            Some(previous) => self.resolve(&key, previous)?,
            None => 0,
        };
        let plan = self.plan_eviction(
            &*inner,
            inner.occupied_size - previous_size,
            inner.max_size - size,
            Some(&key),
        )?;

        // Every size is known from here on; nothing below can fail.
        let previous = inner.entries.pop(&key);
        if previous.is_some() {
            inner.release(previous_size);
        }
        evict(inner, &plan);

        inner.entries.put(key, value);
        inner.occupied_size += size;
        Ok(previous)
    }

    /// Resolves the sizes of the least recently used entries that have to go
    /// for `occupied_size` to drop to `target`, oldest first. `skip` is left
    /// out of the walk. Nothing is mutated.
    fn plan_eviction(
        &self,
        inner: &Inner<K, V>,
        occupied_size: i64,
        target: i64,
        skip: Option<&K>,
    ) -> Result<Vec<i64>> {
        let mut plan = Vec::new();
        let mut remaining = occupied_size;
        let mut candidates = inner
            .entries
            .iter()
            .rev()
            .filter(|(key, _)| Some(*key) != skip);

        while remaining > target {
            let Some((key, value)) = candidates.next() else {
                panic!(
                    "no entries left but occupied size {} still exceeds {}; size bookkeeping has drifted",
                    remaining, target
                );
            };
            let size = self.resolve(key, value)?;
            remaining -= size;
            plan.push(size);
        }
        Ok(plan)
    }

    fn resolve(&self, key: &K, value: &V) -> Result<i64> {
        let size = self.resolver.size_of(key, value);
        if size < 0 {
            return Err(CacheError::InvalidSize(size));
        }
        Ok(size)
    }
}

impl<K: Hash + Eq, V, S> fmt::Debug for SizedLruCache<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SizedLruCache")
            .field("max_size", &inner.max_size)
            .field("occupied_size", &inner.occupied_size)
            .field("len", &inner.entries.len())
            .finish()
    }
}

/// Pops one least recently used entry per planned size. Returns the number
/// of evicted entries.
fn evict<K: Hash + Eq, V>(inner: &mut Inner<K, V>, plan: &[i64]) -> usize {
    for &size in plan {
        inner.entries.pop_lru();
        inner.release(size);
    }

    if !plan.is_empty() {
        debug!(
            evicted = plan.len(),
            freed = plan.iter().sum::<i64>(),
            occupied_size = inner.occupied_size,
            "Evicted least recently used entries"
        );
    }
    plan.len()
}

fn validate_capacity(max_size: i64) -> Result<()> {
    if max_size <= 0 {
        return Err(CacheError::InvalidCapacity(max_size));
    }
    Ok(())
}
