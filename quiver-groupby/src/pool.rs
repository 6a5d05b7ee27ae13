use std::collections::VecDeque;
use std::ops::Deref;
use std::sync::{Condvar, Mutex, PoisonError};

use quiver_result::{Error, Result};

/// A bounded queue of pre-created worker pools.
///
/// This is a plain resource-pool checkout: [`acquire`](PoolQueue::acquire)
/// blocks the calling thread until a pool is free, with no timeout and no
/// cancellation token. The returned guard re-queues the pool when dropped,
/// so a pool is never lost to an error or a panic in the work it ran.
///
/// The queue is the only shared mutable resource between concurrent group-by
/// operations; the pools themselves are handed out exclusively.
pub struct PoolQueue {
    pools: Mutex<VecDeque<rayon::ThreadPool>>,
    available: Condvar,
}

impl PoolQueue {
    /// Pre-create `pool_count` pools of `pool_size` threads each.
    pub fn new(pool_count: usize, pool_size: usize) -> Result<PoolQueue> {
        let mut pools = VecDeque::with_capacity(pool_count);
        for _ in 0..pool_count {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(pool_size)
                .build()
                .map_err(|e| Error::PoolAcquire(format!("failed to build worker pool: {e}")))?;
            pools.push_back(pool);
        }
        Ok(PoolQueue {
            pools: Mutex::new(pools),
            available: Condvar::new(),
        })
    }

    /// Check out a pool, blocking until one is free.
    pub fn acquire(&self) -> PoolGuard<'_> {
        let mut pools = self.pools.lock().unwrap_or_else(PoisonError::into_inner);
        loop {
            if let Some(pool) = pools.pop_front() {
                return PoolGuard {
                    queue: self,
                    pool: Some(pool),
                };
            }
            pools = self
                .available
                .wait(pools)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
}

/// Exclusive handle to a checked-out pool; returns it to the queue on drop.
pub struct PoolGuard<'a> {
    queue: &'a PoolQueue,
    pool: Option<rayon::ThreadPool>,
}

impl Deref for PoolGuard<'_> {
    type Target = rayon::ThreadPool;

    fn deref(&self) -> &rayon::ThreadPool {
        // Present from construction until drop.
        self.pool.as_ref().expect("pool taken before drop")
    }
}

impl Drop for PoolGuard<'_> {
    fn drop(&mut self) {
        if let Some(pool) = self.pool.take() {
            let mut pools = self
                .queue
                .pools
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            pools.push_back(pool);
            self.queue.available.notify_one();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::panic::{AssertUnwindSafe, catch_unwind};

    #[test]
    fn guard_returns_pool_to_queue() {
        let queue = PoolQueue::new(1, 2).unwrap();
        {
            let pool = queue.acquire();
            assert_eq!(pool.current_num_threads(), 2);
        }
        // Would deadlock if the first guard had not returned its pool.
        let _pool = queue.acquire();
    }

    #[test]
    fn pool_survives_a_panic_in_the_borrower() {
        let queue = PoolQueue::new(1, 1).unwrap();
        let result = catch_unwind(AssertUnwindSafe(|| {
            let _pool = queue.acquire();
            panic!("worker blew up");
        }));
        assert!(result.is_err());
        let _pool = queue.acquire();
    }
}
