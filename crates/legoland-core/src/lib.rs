//! legoland-core: composable stream processes over rendezvous channels
//!
//! Small, perpetually running processes are wired together with synchronous
//! point-to-point channels into fixed networks that generate infinite integer
//! sequences. Feedback cycles are allowed as long as each one is seeded.
//!
//! # Modules
//!
//! - [`comm`] - Rendezvous channels and two-way select
//! - [`sync`] - Join barriers (`par` and `WaitGroup`)
//! - [`process`] - The `Process` trait and the primitive, merge and fan-out processes
//! - [`network`] - Network builder, topology checks, and composite networks
//!
//! # Architecture
//!
//! ```text
//!            ┌────────────┐   x   ┌─────────┐  out
//!   z ──────►│ Prefix(0)  │──────►│  Delta  │──────► caller
//!   ▲        └────────────┘       └─────────┘
//!   │                                  │ y
//!   │           ┌─────────┐            │
//!   └───────────│  Succ   │◄───────────┘
//!               └─────────┘
//! ```
//!
//! The diagram is the `nos` network: one thread per box, one rendezvous
//! channel per arrow, and `Prefix` holding the seed that keeps the cycle alive.

#![warn(unused_must_use)]

pub mod comm;
pub mod network;
pub mod process;
pub mod sync;

// Re-exports for convenience
pub use comm::{channel, select, ChannelId, Ready, Receiver, Sender};
pub use network::{fib, int, nos, pairs, squares, Network, Topology};
pub use process::{spawn, Process, ProcessConfig, ProcessHandle};
pub use sync::{par, WaitGroup};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// A single stream element.
///
/// Arithmetic on values always wraps; no process panics on overflow.
pub type Value = i64;

/// Error types for legoland-core
///
/// Stream arithmetic never fails. These errors describe the plumbing around
/// it: channels going away, threads that could not start, and wiring checks.
#[derive(Debug, thiserror::Error)]
#[must_use = "errors must be handled or explicitly ignored with let _ = ..."]
#[non_exhaustive]
pub enum Error {
    /// The other end of a channel was dropped.
    /// Processes treat this as the signal to stop.
    #[error("Channel closed")]
    ChannelClosed,

    /// A bounded send did not find a receiver in time.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// The OS refused to start a process thread.
    #[error("Spawn error: {0}")]
    Spawn(String),

    /// A process thread panicked.
    #[error("Process panicked: {0}")]
    ProcessPanicked(String),

    /// A network's wiring failed a check, e.g. a feedback cycle without a seed.
    #[error("Topology error: {0}")]
    Topology(String),
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Spawn(format!("I/O error: {}", e))
    }
}

/// Result type alias for legoland-core operations
pub type Result<T> = std::result::Result<T, Error>;
