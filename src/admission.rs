//! Admission gating in front of a cache.
//!
//! A rate limiter (or any other policy) decides whether a call reaches the
//! cache at all. The cache knows nothing about it: [`Gated`] asks
//! [`Admission::allow`] first and only then forwards to the wrapped
//! [`CoreCache`]. A denied call returns [`Rejected`] and leaves the cache,
//! including its recency order, untouched.
//!
//! ```text
//!   caller ──► Gated::get(k) ──► allow()? ──no──► Err(Rejected)
//!                                   │
//!                                  yes
//!                                   ▼
//!                           cache.get(k) ──► Ok(Option<&V>)
//! ```
//!
//! Admission implementations carry their own synchronization; the gate
//! only needs `&self`.
//!
//! ## Example
//!
//! ```
//! use std::cell::Cell;
//!
//! use lrukit::admission::Gated;
//! use lrukit::error::Rejected;
//! use lrukit::policy::lru::LruCache;
//!
//! let budget = Cell::new(2u32);
//! let gate = || {
//!     let left = budget.get();
//!     budget.set(left.saturating_sub(1));
//!     left > 0
//! };
//!
//! let mut cache = Gated::new(LruCache::try_new(8).unwrap(), gate);
//! assert_eq!(cache.put(1, "one"), Ok(None));
//! assert_eq!(cache.get(&1), Ok(Some(&"one")));
//! assert_eq!(cache.get(&1), Err(Rejected));
//! ```

use crate::error::Rejected;
use crate::traits::{CoreCache, MutableCache};

/// Decides whether a call may proceed.
pub trait Admission {
    fn allow(&self) -> bool;
}

impl<F> Admission for F
where
    F: Fn() -> bool,
{
    #[inline]
    fn allow(&self) -> bool {
        self()
    }
}

/// Admits every call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysAllow;

impl Admission for AlwaysAllow {
    #[inline]
    fn allow(&self) -> bool {
        true
    }
}

/// A cache whose operations are each checked against an [`Admission`] policy.
#[derive(Debug)]
pub struct Gated<C, A> {
    cache: C,
    admission: A,
}

impl<C, A> Gated<C, A>
where
    A: Admission,
{
    pub fn new(cache: C, admission: A) -> Self {
        Self { cache, admission }
    }

    #[inline]
    fn admit(&self) -> Result<(), Rejected> {
        if self.admission.allow() {
            Ok(())
        } else {
            Err(Rejected)
        }
    }

    pub fn get<K, V>(&mut self, key: &K) -> Result<Option<&V>, Rejected>
    where
        C: CoreCache<K, V>,
    {
        self.admit()?;
        Ok(self.cache.get(key))
    }

    pub fn put<K, V>(&mut self, key: K, value: V) -> Result<Option<V>, Rejected>
    where
        C: CoreCache<K, V>,
    {
        self.admit()?;
        Ok(self.cache.insert(key, value))
    }

    pub fn remove<K, V>(&mut self, key: &K) -> Result<Option<V>, Rejected>
    where
        C: MutableCache<K, V>,
    {
        self.admit()?;
        Ok(self.cache.remove(key))
    }

    /// Direct access for reads that should not consume admission, such as `len`.
    pub fn cache(&self) -> &C {
        &self.cache
    }

    pub fn cache_mut(&mut self) -> &mut C {
        &mut self.cache
    }

    pub fn admission(&self) -> &A {
        &self.admission
    }

    pub fn into_parts(self) -> (C, A) {
        (self.cache, self.admission)
    }
}
