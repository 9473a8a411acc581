//! Bounded worker pool occupancy
//!
//! A [`WorkerPool`] owns the occupancy counter of a Downloader or Converter.
//! Control loops call [`WorkerPool::try_acquire`] before dispatching a unit of
//! work and move the returned [`PoolPermit`] into the spawned task; dropping the
//! permit when the task finishes releases the slot. Occupancy can therefore
//! never exceed the capacity and never go negative.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

#[derive(Debug)]
struct PoolInner {
    name: &'static str,
    capacity: usize,
    semaphore: Arc<Semaphore>,
    active: AtomicUsize,
    peak: AtomicUsize,
}

/// Fixed-capacity pool of execution slots
#[derive(Debug, Clone)]
pub struct WorkerPool {
    inner: Arc<PoolInner>,
}

/// One occupied slot of a [`WorkerPool`], released on drop
#[derive(Debug)]
pub struct PoolPermit {
    inner: Arc<PoolInner>,
    _permit: OwnedSemaphorePermit,
}

impl WorkerPool {
    /// Creates a pool with `capacity` slots
    ///
    /// `name` is only used in log output.
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                name,
                capacity,
                semaphore: Arc::new(Semaphore::new(capacity)),
                active: AtomicUsize::new(0),
                peak: AtomicUsize::new(0),
            }),
        }
    }

    /// Takes a slot if one is free, without waiting
    pub fn try_acquire(&self) -> Option<PoolPermit> {
        let permit = self.inner.semaphore.clone().try_acquire_owned().ok()?;
        let active = self.inner.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.inner.peak.fetch_max(active, Ordering::SeqCst);
        tracing::trace!(
            "{} pool: {}/{} slots in use",
            self.inner.name,
            active,
            self.inner.capacity
        );
        Some(PoolPermit {
            inner: Arc::clone(&self.inner),
            _permit: permit,
        })
    }

    /// Number of slots currently held
    pub fn occupancy(&self) -> usize {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Configured number of slots
    pub fn capacity(&self) -> usize {
        self.inner.capacity
    }

    /// Highest occupancy observed since the pool was created
    pub fn peak(&self) -> usize {
        self.inner.peak.load(Ordering::SeqCst)
    }

    /// Returns true when no slot is held
    pub fn is_idle(&self) -> bool {
        self.occupancy() == 0
    }
}

impl Drop for PoolPermit {
    fn drop(&mut self) {
        // The counter is decremented before the semaphore slot is returned,
        // so `active` never exceeds the number of outstanding semaphore permits.
        self.inner.active.fetch_sub(1, Ordering::SeqCst);
    }
}
