//! Mock handle provider for testing.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{HandleProvider, NamedHandle};

/// Handle produced by [`MockProvider`]; the serial number makes every
/// acquisition distinct even for a repeated name.
#[derive(Debug)]
pub struct MockHandle {
    name: String,
    serial: usize,
}

impl MockHandle {
    pub fn serial(&self) -> usize {
        self.serial
    }
}

impl NamedHandle for MockHandle {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Acquisition failure injected by [`MockProvider::set_fail_on_acquire`].
#[derive(Debug, thiserror::Error)]
#[error("mock acquisition failure for '{name}'")]
pub struct MockAcquireError {
    pub name: String,
}

/// Mock provider that counts acquisitions and releases.
///
/// Returns a fresh [`MockHandle`] on every `acquire`, which is exactly the
/// behavior the cache exists to deduplicate.
#[derive(Debug, Default)]
pub struct MockProvider {
    acquired: AtomicUsize,
    released: AtomicUsize,
    fail_on_acquire: AtomicBool,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_on_acquire(&self, fail: bool) {
        self.fail_on_acquire.store(fail, Ordering::SeqCst);
    }

    pub fn acquired_count(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    pub fn released_count(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Handles handed out by `acquire` and not yet released.
    pub fn outstanding(&self) -> usize {
        self.acquired_count() - self.released_count()
    }
}

impl HandleProvider for MockProvider {
    type Handle = MockHandle;
    type Error = MockAcquireError;

    fn acquire(&self, name: &str) -> Result<MockHandle, MockAcquireError> {
        if self.fail_on_acquire.load(Ordering::SeqCst) {
            return Err(MockAcquireError {
                name: name.to_string(),
            });
        }
        let serial = self.acquired.fetch_add(1, Ordering::SeqCst);
        Ok(MockHandle {
            name: name.to_string(),
            serial,
        })
    }

    fn release(&self, _handle: &MockHandle) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}
