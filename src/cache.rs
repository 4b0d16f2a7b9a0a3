use std::{
    hash::Hash,
    num::NonZeroUsize,
    time::{Duration, Instant},
};

use lru::LruCache;

struct Entry<V> {
    value: V,
    stored_at: Instant,
}

/// LRU-bounded map whose entries also expire `ttl` after insertion.
pub struct TtlCache<K: Hash + Eq, V> {
    entries: LruCache<K, Entry<V>>,
    ttl: Duration,
}

impl<K: Hash + Eq, V: Clone> TtlCache<K, V> {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            ttl,
        }
    }

    pub fn get(&mut self, key: &K) -> Option<V> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&mut self, key: &K, now: Instant) -> Option<V> {
        let expired = match self.entries.get(key) {
            Some(entry) => now.saturating_duration_since(entry.stored_at) >= self.ttl,
            None => return None,
        };
        if expired {
            self.entries.pop(key);
            return None;
        }
        self.entries.peek(key).map(|entry| entry.value.clone())
    }

    pub fn insert(&mut self, key: K, value: V) {
        self.insert_at(key, value, Instant::now());
    }

    pub fn insert_at(&mut self, key: K, value: V, now: Instant) {
        self.entries.put(
            key,
            Entry {
                value,
                stored_at: now,
            },
        );
    }

    pub fn invalidate(&mut self, key: &K) {
        self.entries.pop(key);
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_expire_after_ttl() {
        let start = Instant::now();
        let mut cache = TtlCache::new(4, Duration::from_secs(60));
        cache.insert_at(1, "glow", start);

        assert_eq!(cache.get_at(&1, start + Duration::from_secs(59)), Some("glow"));
        assert_eq!(cache.get_at(&1, start + Duration::from_secs(60)), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn least_recently_used_is_evicted_at_capacity() {
        let now = Instant::now();
        let mut cache = TtlCache::new(2, Duration::from_secs(60));
        cache.insert_at(1, "a", now);
        cache.insert_at(2, "b", now);
        // touch 1 so 2 becomes the eviction candidate
        assert_eq!(cache.get_at(&1, now), Some("a"));
        cache.insert_at(3, "c", now);

        assert_eq!(cache.len(), 2);
        assert_eq!(cache.get_at(&2, now), None);
        assert_eq!(cache.get_at(&1, now), Some("a"));
        assert_eq!(cache.get_at(&3, now), Some("c"));
    }
}
