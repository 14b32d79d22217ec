//! Name-deduplicating handle cache.
//!
//! Messaging clients acquire per-topic handles from their transport, and
//! the transport may hand out a fresh handle on every acquisition even for
//! a name it has seen before. `HandleCache` keeps exactly one live handle
//! per distinct name within one owning context: probes for a known name
//! release the freshly acquired duplicate back to the provider and return
//! the retained handle, and teardown releases every cached handle exactly
//! once.
//!
//! Handles are stored in a red-black tree ordered by name. The tree itself
//! is never thread-safe; the cache wraps one mutex around the whole
//! acquire-candidate, probe, reuse-or-insert sequence so that duplicate
//! acquisition and release appear atomic to every other thread probing the
//! same name.

use std::cmp::Ordering;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, info};

use crate::rbtree::{RbTree, TreeError, Unique};

pub mod mock;

/// A resource handle addressable by name.
///
/// The name must be stable for the lifetime of the handle; it is the cache
/// key (mirroring transports where the handle itself knows its topic name).
pub trait NamedHandle {
    fn name(&self) -> &str;
}

/// External source of handles.
///
/// `acquire` may return a distinct handle object on every call, even for a
/// name it has already served; deduplicating those is the cache's job.
/// `release` is invoked by the cache exactly once per handle it ever
/// acquired, whether that handle was retained until teardown, rejected as
/// a duplicate, or never stored at all.
pub trait HandleProvider {
    type Handle: NamedHandle;
    type Error: std::error::Error + Send + Sync + 'static;

    fn acquire(&self, name: &str) -> std::result::Result<Self::Handle, Self::Error>;

    fn release(&self, handle: &Self::Handle);
}

/// Providers can be shared across owning contexts behind an `Arc`.
impl<P: HandleProvider> HandleProvider for Arc<P> {
    type Handle = P::Handle;
    type Error = P::Error;

    fn acquire(&self, name: &str) -> std::result::Result<Self::Handle, Self::Error> {
        (**self).acquire(name)
    }

    fn release(&self, handle: &Self::Handle) {
        (**self).release(handle)
    }
}

/// Errors that can occur while probing the cache.
#[derive(Debug, thiserror::Error)]
pub enum CacheError<E> {
    /// The provider failed to produce a candidate handle; nothing was
    /// inserted.
    #[error("handle acquisition failed: {0}")]
    Acquire(#[source] E),

    /// The cache could not grow its tree to hold the new handle.
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The cache was closed; no further probes are valid.
    #[error("handle cache is closed")]
    Closed,
}

/// Result type for cache operations.
pub type Result<T, E> = std::result::Result<T, CacheError<E>>;

fn name_order<H: NamedHandle>(a: &Arc<H>, b: &Arc<H>) -> Ordering {
    a.name().cmp(b.name())
}

/// One owning context's handle cache: the provider plus the tree of
/// retained handles behind a single mutex.
pub struct HandleCache<P: HandleProvider> {
    provider: P,
    // `None` once closed; teardown takes the tree out under the lock.
    entries: Mutex<Option<RbTree<Arc<P::Handle>>>>,
}

impl<P: HandleProvider> HandleCache<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            entries: Mutex::new(Some(RbTree::new(name_order::<P::Handle>))),
        }
    }

    /// Return the retained handle for `name`, acquiring one from the
    /// provider if this is the first probe for that name.
    ///
    /// Every candidate this acquires is either retained by the tree or
    /// released back to the provider before returning, all under the cache
    /// lock: a duplicate goes back when the retained handle is reused, and
    /// a candidate the tree could not store goes back alongside the error.
    pub fn get_or_acquire(&self, name: &str) -> Result<Arc<P::Handle>, P::Error> {
        let mut entries = self.lock();
        let tree = entries.as_mut().ok_or(CacheError::Closed)?;

        let candidate = Arc::new(self.provider.acquire(name).map_err(CacheError::Acquire)?);

        match tree.insert_unique(Arc::clone(&candidate)) {
            Ok(Unique::New(node)) => {
                debug!(name, "cached new handle");
                Ok(Arc::clone(tree.object(node)))
            }
            Ok(Unique::Existing { node, .. }) => {
                self.discard(candidate);
                debug!(name, "reusing cached handle");
                Ok(Arc::clone(tree.object(node)))
            }
            Err(err) => {
                // The tree never retained the candidate.
                self.discard(candidate);
                Err(err.into())
            }
        }
    }

    /// Hand an unretained candidate back to the provider. Every path out
    /// of [`HandleCache::get_or_acquire`] that does not store its candidate
    /// in the tree goes through here.
    fn discard(&self, candidate: Arc<P::Handle>) {
        self.provider.release(&candidate);
    }

    /// Number of distinct handles currently retained.
    pub fn len(&self) -> usize {
        self.lock().as_ref().map_or(0, RbTree::len)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_closed(&self) -> bool {
        self.lock().is_none()
    }

    /// Borrow the provider, e.g. for operations outside the cache's scope.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Release every retained handle exactly once and drop the tree.
    ///
    /// Returns the number of handles released. Idempotent: later calls
    /// release nothing, and every later probe fails with
    /// [`CacheError::Closed`]. Also runs on drop if never called.
    pub fn close(&self) -> usize {
        // Hold the lock for the whole teardown so no probe can interleave
        // with the release pass.
        let mut entries = self.lock();
        let tree = match entries.take() {
            Some(tree) => tree,
            None => return 0,
        };

        let mut released = 0;
        tree.traverse(|handle| {
            self.provider.release(handle);
            released += 1;
        });
        info!(released, "handle cache closed");
        // Node storage goes with the tree here; the handles themselves were
        // released above.
        released
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<RbTree<Arc<P::Handle>>>> {
        // A panic while holding the lock leaves the tree structurally
        // consistent (panics can only originate in provider callbacks or
        // comparator calls between tree operations), so poisoning is
        // recoverable.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<P: HandleProvider> Drop for HandleCache<P> {
    fn drop(&mut self) {
        self.close();
    }
}

impl<P: HandleProvider> std::fmt::Debug for HandleCache<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HandleCache")
            .field("len", &self.len())
            .field("closed", &self.is_closed())
            .finish()
    }
}
