//! lrukit: a fixed-capacity LRU cache built from a slot arena, an
//! intrusive recency list and a hash index.
//!
//! See `DESIGN.md` for internal architecture and invariants.

pub mod admission;
pub mod builder;
pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;
pub mod traits;
