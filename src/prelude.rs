pub use crate::admission::{Admission, AlwaysAllow, Gated};
pub use crate::builder::CacheBuilder;
pub use crate::error::{ConfigError, InvariantError, Rejected};
#[cfg(feature = "concurrency")]
pub use crate::policy::concurrent::ConcurrentLruCache;
pub use crate::policy::lru::LruCache;
pub use crate::traits::{CoreCache, LruCacheTrait, MutableCache};
