//! Error types for the lrukit library.
//!
//! ## Key Components
//!
//! - [`ConfigError`]: Returned when cache configuration parameters are invalid
//!   (a capacity of zero).
//! - [`InvariantError`]: Returned by [`LruCache::check_invariants`] when the
//!   index, the recency list and the entry store disagree.
//! - [`Rejected`]: Returned by [`Gated`](crate::admission::Gated) when the
//!   admission check denies a call.
//!
//! Key absence is never an error: lookups return `Option` and removals `bool`.
//!
//! ## Example Usage
//!
//! ```
//! use lrukit::error::ConfigError;
//! use lrukit::policy::lru::LruCache;
//!
//! let cache: Result<LruCache<String, i32>, ConfigError> = LruCache::try_new(100);
//! assert!(cache.is_ok());
//!
//! let bad = LruCache::<String, i32>::try_new(0);
//! assert!(bad.is_err());
//! ```
//!
//! [`LruCache::check_invariants`]: crate::policy::lru::LruCache::check_invariants

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Error returned when cache configuration parameters are invalid.
///
/// Produced by [`LruCache::try_new`](crate::policy::lru::LruCache::try_new)
/// and [`CacheBuilder::try_build`](crate::builder::CacheBuilder::try_build).
///
/// # Example
///
/// ```
/// use lrukit::policy::lru::LruCache;
///
/// let err = LruCache::<u64, u64>::try_new(0).unwrap_err();
/// assert!(err.to_string().contains("capacity"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigError(String);

impl ConfigError {
    /// Creates a new `ConfigError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for ConfigError {}

// ---------------------------------------------------------------------------
// Rejected
// ---------------------------------------------------------------------------

/// The admission check denied the call; the cache was not touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rejected;

impl fmt::Display for Rejected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("request rejected by admission check")
    }
}

impl std::error::Error for Rejected {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
