//! Completion counter barrier

use parking_lot::{Condvar, Mutex};

/// A counter of outstanding units of work
///
/// `add` raises the count, `done` lowers it, and `wait` blocks until it
/// reaches zero.
///
/// # Example
/// ```
/// use legoland_core::WaitGroup;
/// use std::thread;
///
/// let wg = WaitGroup::new();
/// thread::scope(|s| {
///     wg.add(2);
///     s.spawn(|| wg.done());
///     s.spawn(|| wg.done());
///     wg.wait();
/// });
/// assert_eq!(wg.count(), 0);
/// ```
#[derive(Debug, Default)]
pub struct WaitGroup {
    count: Mutex<usize>,
    zero: Condvar,
}

impl WaitGroup {
    /// Create a wait group with nothing outstanding
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `n` more units of work
    pub fn add(&self, n: usize) {
        *self.count.lock() += n;
    }

    /// Mark one unit of work as finished
    ///
    /// # Panics
    /// Panics if called more times than work was added
    pub fn done(&self) {
        let mut count = self.count.lock();
        assert!(*count > 0, "WaitGroup::done called with no outstanding work");
        *count -= 1;
        if *count == 0 {
            self.zero.notify_all();
        }
    }

    /// Calls [`done`](Self::done) when dropped, including on unwind
    pub fn guard(&self) -> DoneGuard<'_> {
        DoneGuard { group: self }
    }

    /// Block until every added unit of work is done
    pub fn wait(&self) {
        let mut count = self.count.lock();
        while *count > 0 {
            self.zero.wait(&mut count);
        }
    }

    /// Outstanding units of work
    pub fn count(&self) -> usize {
        *self.count.lock()
    }
}

/// Marks one unit of a [`WaitGroup`] done on drop
#[derive(Debug)]
pub struct DoneGuard<'a> {
    group: &'a WaitGroup,
}

impl Drop for DoneGuard<'_> {
    fn drop(&mut self) {
        self.group.done();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_wait_with_nothing_added() {
        let wg = WaitGroup::new();
        wg.wait();
        assert_eq!(wg.count(), 0);
    }

    #[test]
    fn test_wait_blocks_until_done() {
        let wg = WaitGroup::new();
        let finished = AtomicUsize::new(0);
        thread::scope(|s| {
            wg.add(3);
            for _ in 0..3 {
                s.spawn(|| {
                    thread::sleep(Duration::from_millis(10));
                    finished.fetch_add(1, Ordering::SeqCst);
                    wg.done();
                });
            }
            wg.wait();
            assert_eq!(finished.load(Ordering::SeqCst), 3);
        });
    }

    #[test]
    fn test_guard_marks_done() {
        let wg = WaitGroup::new();
        wg.add(1);
        {
            let _done = wg.guard();
            assert_eq!(wg.count(), 1);
        }
        assert_eq!(wg.count(), 0);
    }

    #[test]
    fn test_reusable_across_rounds() {
        let wg = WaitGroup::new();
        for _ in 0..3 {
            thread::scope(|s| {
                wg.add(2);
                s.spawn(|| wg.done());
                s.spawn(|| wg.done());
                wg.wait();
            });
        }
        assert_eq!(wg.count(), 0);
    }

    #[test]
    #[should_panic(expected = "no outstanding work")]
    fn test_done_without_add_panics() {
        WaitGroup::new().done();
    }
}
