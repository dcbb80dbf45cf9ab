//! Memoization of render-service image fetches.
//!
//! A lookup never blocks: the first request for a locator returns a handle
//! in the `Loading` state and a background task fills it in once the bytes
//! arrive. Observers poll the handle's state; the cache itself issues no
//! completion callback. While a handle stays cached, every lookup for its
//! locator returns the same instance, so concurrent consumers share one
//! in-flight load instead of duplicating it.
//!
//! A locator that fails to parse is remembered with a permanent invalid
//! sentinel and never attempted again. Eviction under capacity pressure may
//! drop a handle; the next lookup simply re-fetches.

use std::sync::{Arc, Mutex};

use moka::sync::Cache;
use tracing::{debug, warn};
use url::Url;

use crate::api::transport::Transport;

/// Default handle capacity. Icons are small; the roster and item views of a
/// session stay well below this.
const DEFAULT_MAX_ENTRIES: u64 = 1024;

/// Progress of one image load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageState {
    /// Background fetch still in flight.
    Loading,
    /// Raw encoded image bytes, ready to hand to the rendering shell.
    Ready(Vec<u8>),
    /// Fetch failed; the handle stays failed until the cache evicts it.
    Failed,
}

/// A lazily populated image reference, mutated in place by its fetch task.
#[derive(Debug)]
pub struct ImageHandle {
    locator: String,
    state: Mutex<ImageState>,
}

impl ImageHandle {
    fn new(locator: String) -> Self {
        Self {
            locator,
            state: Mutex::new(ImageState::Loading),
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    /// Current load state. Cheap while loading; clones the bytes once ready.
    pub fn state(&self) -> ImageState {
        self.state.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn is_ready(&self) -> bool {
        matches!(*self.state.lock().unwrap_or_else(|e| e.into_inner()), ImageState::Ready(_))
    }

    fn set_state(&self, state: ImageState) {
        *self.state.lock().unwrap_or_else(|e| e.into_inner()) = state;
    }
}

/// A cache slot: either a live handle or the permanent bad-locator sentinel.
#[derive(Clone)]
enum Slot {
    Invalid,
    Handle(Arc<ImageHandle>),
}

/// Bounded cache of image handles keyed by locator string.
#[derive(Clone)]
pub struct ImageCache {
    entries: Cache<String, Slot>,
    transport: Arc<dyn Transport>,
}

impl ImageCache {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_capacity(transport, DEFAULT_MAX_ENTRIES)
    }

    pub fn with_capacity(transport: Arc<dyn Transport>, max_entries: u64) -> Self {
        Self {
            entries: Cache::new(max_entries),
            transport,
        }
    }

    /// Look up (or start loading) the image behind `locator`.
    ///
    /// Returns `None` for a blank locator or one previously recorded as
    /// unparseable; neither performs any I/O. Otherwise returns the shared
    /// handle for the locator, spawning its background fetch on first sight.
    /// The fetch requires an ambient Tokio runtime; without one the handle
    /// is returned already in the `Failed` state.
    pub fn get(&self, locator: &str) -> Option<Arc<ImageHandle>> {
        if locator.trim().is_empty() {
            return None;
        }

        let slot = self
            .entries
            .entry(locator.to_string())
            .or_insert_with(|| self.load_slot(locator))
            .into_value();

        match slot {
            Slot::Invalid => None,
            Slot::Handle(handle) => Some(handle),
        }
    }

    fn load_slot(&self, locator: &str) -> Slot {
        if let Err(e) = Url::parse(locator) {
            warn!(locator, error = %e, "unparseable image locator, recording sentinel");
            return Slot::Invalid;
        }

        let handle = Arc::new(ImageHandle::new(locator.to_string()));

        // The fetch needs a runtime to run on. Without one the handle is
        // marked failed instead of panicking the caller; eviction lets a
        // later lookup retry once a runtime exists.
        let runtime = match tokio::runtime::Handle::try_current() {
            Ok(runtime) => runtime,
            Err(_) => {
                warn!(locator, "no async runtime, image load marked failed");
                handle.set_state(ImageState::Failed);
                return Slot::Handle(handle);
            }
        };

        debug!(locator, "starting background image fetch");
        let transport = Arc::clone(&self.transport);
        let task_handle = Arc::clone(&handle);
        runtime.spawn(async move {
            match transport.get_bytes(task_handle.locator()).await {
                Ok(bytes) => task_handle.set_state(ImageState::Ready(bytes)),
                Err(e) => {
                    warn!(locator = task_handle.locator(), error = %e, "image fetch failed");
                    task_handle.set_state(ImageState::Failed);
                }
            }
        });
        Slot::Handle(handle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::transport::testing::FakeTransport;
    use std::time::Duration;

    fn cache_with(transport: FakeTransport) -> (ImageCache, Arc<FakeTransport>) {
        let transport = Arc::new(transport);
        (ImageCache::new(transport.clone()), transport)
    }

    #[test]
    fn test_blank_locator_returns_none_without_io() {
        let (cache, transport) = cache_with(FakeTransport::new());
        assert!(cache.get("").is_none());
        assert!(cache.get("   ").is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_malformed_locator_records_permanent_sentinel() {
        let (cache, transport) = cache_with(FakeTransport::new());
        assert!(cache.get("not a url").is_none());
        // Second lookup short-circuits on the sentinel: still zero I/O.
        assert!(cache.get("not a url").is_none());
        assert_eq!(transport.calls(), 0);
    }

    #[test]
    fn test_lookup_without_runtime_fails_handle_instead_of_panicking() {
        let (cache, transport) = cache_with(FakeTransport::new());
        let handle = cache
            .get("https://render.example/file/abc/1.png")
            .expect("handle");
        assert_eq!(handle.state(), ImageState::Failed);
        assert_eq!(transport.calls(), 0);
    }

    #[tokio::test]
    async fn test_lookups_share_one_handle_and_one_fetch() {
        let transport = FakeTransport::new();
        transport.insert("https://render.example/file/abc/1.png", "png-bytes");
        let (cache, transport) = cache_with(transport);

        let first = cache
            .get("https://render.example/file/abc/1.png")
            .expect("handle");
        let second = cache
            .get("https://render.example/file/abc/1.png")
            .expect("same handle");
        assert!(Arc::ptr_eq(&first, &second));

        // Let the background task run, then confirm a single fetch happened.
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(transport.calls(), 1);
        assert_eq!(first.state(), ImageState::Ready(b"png-bytes".to_vec()));
    }

    #[tokio::test]
    async fn test_failed_fetch_flips_handle_to_failed() {
        // No canned body: the fake transport answers 404.
        let (cache, transport) = cache_with(FakeTransport::new());

        let handle = cache
            .get("https://render.example/file/missing.png")
            .expect("handle");
        assert_eq!(handle.state(), ImageState::Loading);

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(handle.state(), ImageState::Failed);
        assert_eq!(transport.calls(), 1);
    }
}
