// /////////////////////////////////////////////////////////////////////////////
// Adaptive Pipeline
// Copyright (c) 2025 Michael Gardner, A Bit of Help, Inc.
// SPDX-License-Identifier: BSD-3-Clause
// See LICENSE file in the project root.
// /////////////////////////////////////////////////////////////////////////////

//! # Translation Cache (C4 support)
//!
//! Bounded LRU memoisation of coercion-rule dispatch, keyed by
//! `(runtime-observed source type, declared destination type)` (§4.4, §9
//! resolution 4). A single `parking_lot::Mutex` around the cache only is
//! the one write-shared structure on the delivery hot path (§5, §10.4).

use std::num::NonZeroUsize;

use lru::LruCache;
use parking_lot::Mutex;

use eidolon_domain::value_objects::{CoercionRule, TypeExpr};

pub struct TranslationCache {
    inner: Mutex<LruCache<(TypeExpr, TypeExpr), Option<CoercionRule>>>,
    hits: std::sync::atomic::AtomicU64,
    misses: std::sync::atomic::AtomicU64,
}

impl TranslationCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity.max(1)).expect("capacity clamped to at least 1");
        Self {
            inner: Mutex::new(LruCache::new(capacity)),
            hits: std::sync::atomic::AtomicU64::new(0),
            misses: std::sync::atomic::AtomicU64::new(0),
        }
    }

    /// Returns the coercion strategy bridging `src` into `dst`, if any,
    /// computing and memoising it on first use.
    pub fn resolve(&self, src: &TypeExpr, dst: &TypeExpr) -> Option<CoercionRule> {
        use std::sync::atomic::Ordering;

        let key = (src.clone(), dst.clone());
        if let Some(hit) = self.inner.lock().get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return hit.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let resolved = CoercionRule::resolve(src, dst);
        self.inner.lock().put(key, resolved.clone());
        resolved
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(std::sync::atomic::Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(std::sync::atomic::Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caches_a_resolution_across_repeated_lookups() {
        let cache = TranslationCache::new(4);
        assert_eq!(cache.resolve(&TypeExpr::Int, &TypeExpr::Float), Some(CoercionRule::NumericWiden));
        assert_eq!(cache.resolve(&TypeExpr::Int, &TypeExpr::Float), Some(CoercionRule::NumericWiden));
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn caches_a_negative_resolution_too() {
        let cache = TranslationCache::new(4);
        assert_eq!(cache.resolve(&TypeExpr::Str, &TypeExpr::Int), None);
        assert_eq!(cache.resolve(&TypeExpr::Str, &TypeExpr::Int), None);
        assert_eq!(cache.hits(), 1);
    }

    #[test]
    fn evicts_least_recently_used_entry_once_full() {
        let cache = TranslationCache::new(1);
        cache.resolve(&TypeExpr::Int, &TypeExpr::Float);
        cache.resolve(&TypeExpr::Str, &TypeExpr::Bytes);
        assert_eq!(cache.misses(), 2);
        // The Int->Float entry was evicted; looking it up again is a miss.
        cache.resolve(&TypeExpr::Int, &TypeExpr::Float);
        assert_eq!(cache.misses(), 3);
    }
}
