//! Bounded object pools for high frequency messages
//!
//! Producers take an object with [`ObjectPool::get`], fill it, and move it
//! into a message. Dropping the [`Pooled`] handle (directly or through
//! `discard`) resets the object and returns it to the free list.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// An object that can be recycled through an [`ObjectPool`].
pub trait Poolable: Default + Send + 'static {
    /// Clear every field so no data from a previous use is observable.
    fn reset(&mut self);
}

struct PoolInner<T> {
    free: Mutex<Vec<T>>,
    max_size: usize,
    active: AtomicUsize,
}

/// Shared handle to a bounded free list.
///
/// Cloning the handle shares the same free list.
pub struct ObjectPool<T: Poolable> {
    inner: Arc<PoolInner<T>>,
}

impl<T: Poolable> Clone for ObjectPool<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Poolable> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("inactive", &self.count_inactive())
            .field("active", &self.count_active())
            .field("max_size", &self.inner.max_size)
            .finish()
    }
}

impl<T: Poolable> ObjectPool<T> {
    /// Create a pool reserving room for `default_capacity` idle objects and
    /// retaining at most `max_size` of them.
    pub fn new(default_capacity: usize, max_size: usize) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(Vec::with_capacity(default_capacity.min(max_size))),
                max_size,
                active: AtomicUsize::new(0),
            }),
        }
    }

    fn free(&self) -> MutexGuard<'_, Vec<T>> {
        self.inner.free.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Take an idle object, or create one when the free list is empty.
    pub fn get(&self) -> Pooled<T> {
        let value = self.free().pop().unwrap_or_default();
        self.inner.active.fetch_add(1, Ordering::Relaxed);
        Pooled {
            value,
            pool: self.clone(),
        }
    }

    /// Reset `value` and keep it for reuse. Dropped when the pool is full.
    fn release(&self, mut value: T) {
        self.inner.active.fetch_sub(1, Ordering::Relaxed);
        value.reset();
        let mut free = self.free();
        if free.len() < self.inner.max_size {
            free.push(value);
        }
    }

    /// Objects sitting idle in the free list.
    pub fn count_inactive(&self) -> usize {
        self.free().len()
    }

    /// Objects handed out and not yet returned.
    pub fn count_active(&self) -> usize {
        self.inner.active.load(Ordering::Relaxed)
    }

    pub fn max_size(&self) -> usize {
        self.inner.max_size
    }

    /// Drop every idle object.
    pub fn clear(&self) {
        self.free().clear();
    }
}

/// An object on loan from an [`ObjectPool`].
///
/// Returned to the pool on drop.
pub struct Pooled<T: Poolable> {
    value: T,
    pool: ObjectPool<T>,
}

impl<T: Poolable> Pooled<T> {
    /// Return the object to its pool.
    pub fn discard(self) {
        drop(self);
    }
}

impl<T: Poolable> Deref for Pooled<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.value
    }
}

impl<T: Poolable> DerefMut for Pooled<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.value
    }
}

impl<T: Poolable + std::fmt::Debug> std::fmt::Debug for Pooled<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.value.fmt(f)
    }
}

impl<T: Poolable> Drop for Pooled<T> {
    fn drop(&mut self) {
        let value = std::mem::take(&mut self.value);
        self.pool.release(value);
    }
}
