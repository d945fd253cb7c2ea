//! Fork-join of two units of work

use std::panic;
use std::thread;

/// Run `left` and `right` concurrently and return once both have finished
///
/// `right` runs on a scoped worker thread while `left` runs on the calling
/// thread, so both may borrow from the caller. A panic on either side is
/// re-raised here after the other side has completed.
///
/// # Example
/// ```
/// use legoland_core::par;
///
/// let (a, b) = par(|| 1 + 1, || 2 * 3);
/// assert_eq!((a, b), (2, 6));
/// ```
pub fn par<L, R, A, B>(left: L, right: R) -> (A, B)
where
    L: FnOnce() -> A,
    R: FnOnce() -> B + Send,
    B: Send,
{
    thread::scope(|s| {
        let worker = s.spawn(right);
        let a = left();
        match worker.join() {
            Ok(b) => (a, b),
            Err(payload) => panic::resume_unwind(payload),
        }
    })
}
