//! Keyed memoization cache with selectable eviction

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, VecDeque};
use std::hash::Hash;
use tracing::debug;

/// Eviction policy for a [`ScenarioCache`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Eviction {
    /// Keep everything for the life of the process
    Unbounded,
    /// Drop the least recently used entry beyond `capacity` (0 disables caching)
    Lru { capacity: usize },
}

impl Eviction {
    /// `None` means unbounded
    pub fn from_capacity(capacity: Option<usize>) -> Self {
        match capacity {
            Some(capacity) => Eviction::Lru { capacity },
            None => Eviction::Unbounded,
        }
    }
}

/// Cache sizing for the scenario loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Classified scenario bundles kept (`None` = unbounded)
    pub max_bundles: Option<usize>,
    /// Parsed source datasets kept (`None` = unbounded)
    pub max_datasets: Option<usize>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_bundles: None,
            max_datasets: Some(2),
        }
    }
}

/// Map from key to shared value with recency tracking
pub struct ScenarioCache<K, V> {
    entries: HashMap<K, V>,
    /// Least recently used at the front
    recency: VecDeque<K>,
    eviction: Eviction,
    evictions: u64,
}

impl<K, V> ScenarioCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(eviction: Eviction) -> Self {
        Self {
            entries: HashMap::new(),
            recency: VecDeque::new(),
            eviction,
            evictions: 0,
        }
    }

    fn touch(&mut self, key: &K) {
        if let Some(pos) = self.recency.iter().position(|k| k == key) {
            if let Some(k) = self.recency.remove(pos) {
                self.recency.push_back(k);
            }
        }
    }

    /// Look up a value, marking it most recently used
    pub fn get(&mut self, key: &K) -> Option<V> {
        let value = self.entries.get(key).cloned()?;
        self.touch(key);
        Some(value)
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Insert a value, evicting as the policy requires.
    ///
    /// Returns the number of entries evicted.
    pub fn insert(&mut self, key: K, value: V) -> usize {
        if self.entries.contains_key(&key) {
            self.entries.insert(key.clone(), value);
            self.touch(&key);
            return 0;
        }

        let mut evicted = 0;
        if let Eviction::Lru { capacity } = self.eviction {
            if capacity == 0 {
                return 0;
            }
            while self.entries.len() >= capacity {
                let Some(oldest) = self.recency.pop_front() else {
                    break;
                };
                self.entries.remove(&oldest);
                evicted += 1;
            }
        }

        self.entries.insert(key.clone(), value);
        self.recency.push_back(key);
        self.evictions += evicted as u64;
        if evicted > 0 {
            debug!("Evicted {} cache entries", evicted);
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total entries evicted since creation
    pub fn evictions(&self) -> u64 {
        self.evictions
    }

    pub fn eviction(&self) -> Eviction {
        self.eviction
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.recency.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_insert() {
        let mut cache = ScenarioCache::new(Eviction::Unbounded);
        assert_eq!(cache.get(&"a"), None);

        cache.insert("a", 1);
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_unbounded_never_evicts() {
        let mut cache = ScenarioCache::new(Eviction::Unbounded);
        for i in 0..1000 {
            cache.insert(i, i * 2);
        }
        assert_eq!(cache.len(), 1000);
        assert_eq!(cache.evictions(), 0);
    }

    #[test]
    fn test_lru_evicts_least_recent() {
        let mut cache = ScenarioCache::new(Eviction::Lru { capacity: 2 });
        cache.insert("a", 1);
        cache.insert("b", 2);

        // Touch "a" so "b" becomes least recently used
        assert_eq!(cache.get(&"a"), Some(1));
        assert_eq!(cache.insert("c", 3), 1);

        assert!(cache.contains(&"a"));
        assert!(!cache.contains(&"b"));
        assert!(cache.contains(&"c"));
        assert_eq!(cache.evictions(), 1);
    }

    #[test]
    fn test_reinsert_replaces_without_eviction() {
        let mut cache = ScenarioCache::new(Eviction::Lru { capacity: 1 });
        cache.insert("a", 1);
        assert_eq!(cache.insert("a", 5), 0);
        assert_eq!(cache.get(&"a"), Some(5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_zero_capacity_disables_caching() {
        let mut cache = ScenarioCache::new(Eviction::from_capacity(Some(0)));
        cache.insert("a", 1);
        assert!(cache.is_empty());
    }

    #[test]
    fn test_clear() {
        let mut cache = ScenarioCache::new(Eviction::from_capacity(None));
        cache.insert(1, "x");
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&1), None);
    }
}
