//! Stream processes
//!
//! A process is a loop bound to channel endpoints. Each one runs on its own
//! thread until a channel it uses is disconnected.

mod fanout;
mod merge;
mod primitives;

pub use fanout::{Delta, DeltaWg};
pub use merge::{Plus, PlusNaive, PlusSerial, PlusWg, PlusWrong};
pub use primitives::{Id, Prefix, Sink, Succ, Tail};

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::comm::ChannelId;
use crate::{Error, Result};

/// A perpetually running unit of computation
///
/// `run` only returns on failure; `Error::ChannelClosed` is the normal way
/// out once a neighbour has gone away.
pub trait Process: Send + 'static {
    /// Short kind name, e.g. `"delta"`
    fn name(&self) -> &'static str;

    /// Channels this process reads from
    fn inputs(&self) -> Vec<ChannelId>;

    /// Channels this process writes to
    fn outputs(&self) -> Vec<ChannelId>;

    /// Whether this process injects a value before reading anything
    fn is_seed(&self) -> bool {
        false
    }

    /// Run the process loop on the current thread
    fn run(self) -> Result<()>;
}

/// Configuration for a spawned process
#[derive(Debug, Clone)]
pub struct ProcessConfig {
    /// Thread name, used in logs
    pub name: Arc<str>,
    /// Thread stack size in bytes (platform default if None)
    pub stack_size: Option<usize>,
}

impl Default for ProcessConfig {
    fn default() -> Self {
        Self {
            name: "process".into(),
            stack_size: None,
        }
    }
}

impl ProcessConfig {
    /// Create a new config with the given name
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Set the thread stack size
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }
}

/// Handle to a running process
#[derive(Debug)]
pub struct ProcessHandle {
    name: Arc<str>,
    thread: Option<JoinHandle<Result<()>>>,
}

impl ProcessHandle {
    /// Thread name of the process
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the process has stopped
    pub fn is_finished(&self) -> bool {
        self.thread.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Wait for the process to stop
    ///
    /// Blocks forever if the process never loses a channel.
    pub fn join(mut self) -> Result<()> {
        if let Some(handle) = self.thread.take() {
            handle
                .join()
                .map_err(|_| Error::ProcessPanicked(self.name.to_string()))??;
        }
        Ok(())
    }
}

/// Spawn a process on a new thread
pub fn spawn<P: Process>(config: ProcessConfig, process: P) -> Result<ProcessHandle> {
    let name = config.name.clone();
    let mut builder = thread::Builder::new().name(name.to_string());
    if let Some(bytes) = config.stack_size {
        builder = builder.stack_size(bytes);
    }

    let thread_name = name.clone();
    let thread = builder.spawn(move || {
        tracing::debug!("{}: started", thread_name);
        match process.run() {
            Ok(()) => Ok(()),
            Err(Error::ChannelClosed) => {
                tracing::debug!("{}: channel closed, stopping", thread_name);
                Ok(())
            }
            Err(e) => {
                tracing::warn!("{}: stopped with error: {}", thread_name, e);
                Err(e)
            }
        }
    })?;

    Ok(ProcessHandle {
        name,
        thread: Some(thread),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::{channel, Receiver, Sender};
    use crate::Value;
    use std::time::Duration;

    struct Doubler {
        input: Receiver<Value>,
        output: Sender<Value>,
    }

    impl Process for Doubler {
        fn name(&self) -> &'static str {
            "doubler"
        }

        fn inputs(&self) -> Vec<ChannelId> {
            vec![self.input.id()]
        }

        fn outputs(&self) -> Vec<ChannelId> {
            vec![self.output.id()]
        }

        fn run(self) -> Result<()> {
            loop {
                let v = self.input.recv()?;
                self.output.send(v.wrapping_mul(2))?;
            }
        }
    }

    struct Exploder;

    impl Process for Exploder {
        fn name(&self) -> &'static str {
            "exploder"
        }

        fn inputs(&self) -> Vec<ChannelId> {
            Vec::new()
        }

        fn outputs(&self) -> Vec<ChannelId> {
            Vec::new()
        }

        fn run(self) -> Result<()> {
            panic!("boom");
        }
    }

    #[test]
    fn test_config_builder() {
        let config = ProcessConfig::new("worker").with_stack_size(64 * 1024);
        assert_eq!(&*config.name, "worker");
        assert_eq!(config.stack_size, Some(64 * 1024));
        assert!(ProcessConfig::default().stack_size.is_none());
    }

    #[test]
    fn test_spawned_process_runs() {
        let (in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        let handle = spawn(
            ProcessConfig::new("doubler"),
            Doubler {
                input: in_rx,
                output: out_tx,
            },
        )
        .unwrap();

        assert_eq!(handle.name(), "doubler");
        in_tx.send(21).unwrap();
        assert_eq!(out_rx.recv_timeout(Duration::from_secs(5)).unwrap(), Some(42));
        assert!(!handle.is_finished());
    }

    #[test]
    fn test_disconnect_stops_cleanly() {
        let (in_tx, in_rx) = channel();
        let (out_tx, _out_rx) = channel();
        let handle = spawn(
            ProcessConfig::new("doubler"),
            Doubler {
                input: in_rx,
                output: out_tx,
            },
        )
        .unwrap();

        drop(in_tx);
        handle.join().unwrap();
    }

    #[test]
    fn test_panic_reported_on_join() {
        let handle = spawn(ProcessConfig::new("exploder"), Exploder).unwrap();
        let err = handle.join().unwrap_err();
        assert!(matches!(err, Error::ProcessPanicked(ref name) if name == "exploder"));
    }
}
