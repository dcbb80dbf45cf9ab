//! Keyed memoization of decoded API responses.
//!
//! The cache key is the canonical rendered URL; the entry remembers a
//! fingerprint of the raw body it was decoded from. A repeat fetch whose
//! body is unchanged returns the stored value without re-decoding; a changed
//! body replaces the entry (last writer wins).
//!
//! Eviction is an explicit bounded capacity rather than a memory-pressure
//! heuristic, so behavior under load is deterministic and testable. Evicted
//! keys simply decode again on their next lookup,
//! which is why decode closures must be side-effect-free and idempotent.
//!
//! Two workers racing on the same key may both decode; the map's per-key
//! atomicity keeps the entry consistent and the extra decode is the accepted
//! cost of not serializing unrelated keys behind one lock.

use std::any::Any;
use std::sync::Arc;

use moka::sync::Cache;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use crate::api::decode::DecodeError;

/// Default entry capacity. Each entry is one decoded response for one
/// canonical URL; a session rarely touches more than a few hundred.
const DEFAULT_MAX_ENTRIES: u64 = 512;

#[derive(Clone)]
struct CacheEntry {
    /// SHA-256 of the raw body text the value was decoded from.
    fingerprint: [u8; 32],
    /// Decoded value; heterogeneous across keys, downcast on lookup.
    value: Arc<dyn Any + Send + Sync>,
}

/// Bounded memoization of decoded responses, keyed by canonical URL.
///
/// Cheap to clone; clones share the same underlying map. Construct one at
/// startup and hand it to every consumer.
#[derive(Clone)]
pub struct QueryCache {
    entries: Cache<String, CacheEntry>,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryCache {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(max_entries: u64) -> Self {
        Self {
            entries: Cache::new(max_entries),
        }
    }

    /// Return the memoized value for `key` if `raw` is byte-identical to the
    /// body it was decoded from; otherwise decode `raw`, store the result and
    /// return it.
    ///
    /// A decode failure is logged and propagated without storing anything,
    /// so the next call for the key retries the decode.
    pub fn get_or_decode<T, F>(&self, key: &str, raw: &str, decode: F) -> Result<Arc<T>, DecodeError>
    where
        T: Send + Sync + 'static,
        F: FnOnce(&str) -> Result<T, DecodeError>,
    {
        let fingerprint = fingerprint(raw);

        if let Some(entry) = self.entries.get(key) {
            if entry.fingerprint == fingerprint {
                // A downcast mismatch means the key was reused for another
                // target type; treat it as a miss, not a corruption.
                if let Ok(value) = entry.value.downcast::<T>() {
                    return Ok(value);
                }
            }
        }

        debug!(key, fingerprint = %hex::encode(&fingerprint[..8]), "query cache miss, decoding");
        let value = match decode(raw) {
            Ok(value) => Arc::new(value),
            Err(e) => {
                warn!(key, error = %e, "failed to decode response body");
                return Err(e);
            }
        };

        self.entries.insert(
            key.to_string(),
            CacheEntry {
                fingerprint,
                value: value.clone(),
            },
        );
        Ok(value)
    }

    /// Drop every entry. Shells call this on logout or account switch.
    pub fn clear(&self) {
        self.entries.invalidate_all();
    }
}

fn fingerprint(raw: &str) -> [u8; 32] {
    Sha256::digest(raw.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_unchanged_content_decodes_once() {
        let cache = QueryCache::new();
        let decodes = AtomicUsize::new(0);
        let decode = |raw: &str| {
            decodes.fetch_add(1, Ordering::SeqCst);
            Ok(raw.len())
        };

        let first = cache
            .get_or_decode("k", "[1,2,3]", decode)
            .expect("first decode");
        let second = cache
            .get_or_decode("k", "[1,2,3]", decode)
            .expect("cache hit");

        assert_eq!(decodes.load(Ordering::SeqCst), 1);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn test_changed_content_decodes_again() {
        let cache = QueryCache::new();
        let decodes = AtomicUsize::new(0);
        let decode = |raw: &str| {
            decodes.fetch_add(1, Ordering::SeqCst);
            Ok(raw.to_string())
        };

        let first = cache.get_or_decode("k", "old", decode).expect("decode old");
        let second = cache.get_or_decode("k", "new", decode).expect("decode new");

        assert_eq!(decodes.load(Ordering::SeqCst), 2);
        assert_eq!(*first, "old");
        assert_eq!(*second, "new");
    }

    #[test]
    fn test_distinct_keys_do_not_collide() {
        let cache = QueryCache::new();
        let a = cache
            .get_or_decode("a", "body", |r| Ok(format!("a:{r}")))
            .expect("decode a");
        let b = cache
            .get_or_decode("b", "body", |r| Ok(format!("b:{r}")))
            .expect("decode b");
        assert_ne!(*a, *b);
    }

    #[test]
    fn test_decode_failure_is_not_stored() {
        let cache = QueryCache::new();

        let failed: Result<Arc<usize>, _> = cache.get_or_decode("k", "bad", |_| {
            Err(DecodeError::Shape("not a list".into()))
        });
        assert!(failed.is_err());

        // The failed attempt must not poison the key; a retry decodes.
        let decodes = AtomicUsize::new(0);
        let value = cache
            .get_or_decode("k", "bad", |raw| {
                decodes.fetch_add(1, Ordering::SeqCst);
                Ok(raw.len())
            })
            .expect("retry succeeds");
        assert_eq!(decodes.load(Ordering::SeqCst), 1);
        assert_eq!(*value, 3);
    }

    #[test]
    fn test_clear_forces_redecode() {
        let cache = QueryCache::new();
        let decodes = AtomicUsize::new(0);
        let decode = |raw: &str| {
            decodes.fetch_add(1, Ordering::SeqCst);
            Ok(raw.len())
        };

        cache.get_or_decode("k", "body", decode).expect("decode");
        cache.clear();
        cache.get_or_decode("k", "body", decode).expect("redecode");
        assert_eq!(decodes.load(Ordering::SeqCst), 2);
    }
}
