//! Size Resolver Module
//!
//! Assigns an occupied size to each cached entry.
//!
//! The cache enforces `sum(size_of(entry)) <= max_size`. With the default
//! [`UnitSize`] every entry costs 1, so `max_size` is an entry count. A
//! custom resolver bounds bytes (or any other unit) instead.
//!
//! Sizes are recomputed on removal rather than stored, so a resolver must
//! be a pure function of the key/value pair.

// == Size Resolver ==
/// Computes the occupied size of a cache entry.
///
/// Any `Fn(&K, &V) -> i64` closure is a resolver. A negative result is
/// rejected by the cache with [`CacheError::InvalidSize`](crate::error::CacheError::InvalidSize).
pub trait SizeResolver<K, V>: Send + Sync {
    fn size_of(&self, key: &K, value: &V) -> i64;
}

// == Unit Size ==
/// Every entry costs exactly 1. This is the default resolver.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnitSize;

impl<K, V> SizeResolver<K, V> for UnitSize {
    #[inline]
    fn size_of(&self, _key: &K, _value: &V) -> i64 {
        1
    }
}

impl<K, V, F> SizeResolver<K, V> for F
where
    F: Fn(&K, &V) -> i64 + Send + Sync,
{
    #[inline]
    fn size_of(&self, key: &K, value: &V) -> i64 {
        self(key, value)
    }
}
