//! Join barriers
//!
//! [`par`] is the fork-join used by the merge and fan-out processes.
//! [`WaitGroup`] is the same barrier spelled out as a completion counter.

mod par;
mod wait_group;

pub use par::par;
pub use wait_group::{DoneGuard, WaitGroup};
