//! Memoization
//!
//! Resolution and downgrade are pure, so their results can be cached.
//! A hit and a miss always produce the same value.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Get-or-compute cache contract
pub trait Memo<K, V>: Send + Sync {
    fn get_or_compute(&self, key: K, compute: &dyn Fn(&K) -> V) -> V;

    fn stats(&self) -> CacheStats {
        CacheStats::default()
    }
}

/// Always computes; used when caching is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoMemo;

impl<K, V> Memo<K, V> for NoMemo {
    fn get_or_compute(&self, key: K, compute: &dyn Fn(&K) -> V) -> V {
        compute(&key)
    }
}

#[derive(Debug)]
struct Entry<V> {
    value: V,
    last_accessed: u64,
}

#[derive(Debug)]
struct State<K, V> {
    entries: HashMap<K, Entry<V>>,
    tick: u64,
    hits: u64,
    misses: u64,
}

/// Bounded LRU cache shared between threads
#[derive(Debug)]
pub struct MemoCache<K, V> {
    state: Mutex<State<K, V>>,
    max_entries: usize,
}

impl<K, V> MemoCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(max_entries: usize) -> Self {
        Self {
            state: Mutex::new(State {
                entries: HashMap::new(),
                tick: 0,
                hits: 0,
                misses: 0,
            }),
            max_entries,
        }
    }

    // Cached values stay valid even if another thread panicked mid-update
    fn lock(&self) -> MutexGuard<'_, State<K, V>> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn lookup(&self, key: &K) -> Option<V> {
        let mut guard = self.lock();
        let state = &mut *guard;
        state.tick += 1;
        match state.entries.get_mut(key) {
            Some(entry) => {
                entry.last_accessed = state.tick;
                state.hits += 1;
                Some(entry.value.clone())
            }
            None => {
                state.misses += 1;
                None
            }
        }
    }

    fn store(&self, key: K, value: V) {
        if self.max_entries == 0 {
            return;
        }
        let mut state = self.lock();
        if !state.entries.contains_key(&key) {
            while state.entries.len() >= self.max_entries {
                let oldest = state
                    .entries
                    .iter()
                    .min_by_key(|(_, e)| e.last_accessed)
                    .map(|(k, _)| k.clone());
                match oldest {
                    Some(k) => {
                        state.entries.remove(&k);
                    }
                    None => break,
                }
            }
        }
        state.tick += 1;
        let last_accessed = state.tick;
        state.entries.insert(key, Entry { value, last_accessed });
    }

    pub fn clear(&self) {
        self.lock().entries.clear();
    }

    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<K, V> Memo<K, V> for MemoCache<K, V>
where
    K: Eq + Hash + Clone + Send,
    V: Clone + Send,
{
    fn get_or_compute(&self, key: K, compute: &dyn Fn(&K) -> V) -> V {
        if let Some(value) = self.lookup(&key) {
            return value;
        }
        let value = compute(&key);
        self.store(key, value.clone());
        value
    }

    fn stats(&self) -> CacheStats {
        let state = self.lock();
        CacheStats {
            entry_count: state.entries.len(),
            max_entries: self.max_entries,
            hits: state.hits,
            misses: state.misses,
        }
    }
}

/// Cache statistics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub entry_count: usize,
    pub max_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}
