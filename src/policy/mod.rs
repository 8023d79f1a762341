#[cfg(feature = "concurrency")]
pub mod concurrent;
pub mod lru;

#[cfg(feature = "concurrency")]
pub use concurrent::ConcurrentLruCache;
pub use lru::LruCache;
