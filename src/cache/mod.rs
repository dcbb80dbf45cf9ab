//! In-memory response caches.
//!
//! Nothing here persists across process restarts; both caches are bounded
//! in-memory maps that trade occasional recomputation for simplicity.

pub mod image;
pub mod query;

pub use image::{ImageCache, ImageHandle, ImageState};
pub use query::QueryCache;
