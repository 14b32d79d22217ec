//! rbcache - name-deduplicating handle cache on an arena red-black tree.
//!
//! Two layers:
//! - [`rbtree`]: a generic ordered container keyed by a caller-supplied
//!   three-way comparator, with no internal locking;
//! - [`cache`]: a mutex-guarded cache mapping a textual name to exactly one
//!   externally-owned resource handle per owning context, deduplicating
//!   redundant acquisitions from a [`cache::HandleProvider`].

pub mod cache;
pub mod rbtree;

pub use cache::{CacheError, HandleCache, HandleProvider, NamedHandle};
pub use rbtree::{Comparator, NodeId, RbTree, TreeError, Unique};
