//! Process networks
//!
//! A [`Network`] owns the handles of the processes it started together with
//! a [`Topology`] describing how they are wired. The composite constructors
//! ([`nos`], [`int`], [`pairs`], [`fib`], [`squares`]) each build one.

mod composites;
mod topology;

pub use composites::{fib, int, nos, pairs, squares};
pub use topology::{Node, Topology};

use std::sync::Arc;

use crate::process::{self, Process, ProcessConfig, ProcessHandle};
use crate::Result;

/// A fixed set of running processes and their wiring
///
/// Processes are started as they are added and keep running after the
/// `Network` is dropped; dropping only detaches the handles.
///
/// # Example
/// ```
/// use legoland_core::channel;
/// use legoland_core::network::Network;
/// use legoland_core::process::{Prefix, Sink};
///
/// let (tx, rx) = channel();
/// let (_seed_tx, seed_rx) = channel();
///
/// let mut net = Network::new("demo");
/// net.spawn(Prefix::new(1, seed_rx, tx)).unwrap();
/// net.spawn(Sink::new(rx)).unwrap();
///
/// assert_eq!(net.len(), 2);
/// assert!(net.validate().is_ok());
/// ```
#[derive(Debug)]
pub struct Network {
    name: Arc<str>,
    stack_size: Option<usize>,
    processes: Vec<ProcessHandle>,
    topology: Topology,
}

impl Network {
    /// Create an empty network
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            stack_size: None,
            processes: Vec::new(),
            topology: Topology::new(),
        }
    }

    /// Set the stack size for threads spawned from now on
    pub fn with_stack_size(mut self, bytes: usize) -> Self {
        self.stack_size = Some(bytes);
        self
    }

    /// Network name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Start a process and record it in the topology
    pub fn spawn<P: Process>(&mut self, process: P) -> Result<()> {
        let kind = process.name();
        let node = Node {
            name: kind.to_string(),
            kind,
            seed: process.is_seed(),
            inputs: process.inputs(),
            outputs: process.outputs(),
        };

        let mut config = ProcessConfig::new(format!("{}/{}", self.name, kind));
        if let Some(bytes) = self.stack_size {
            config = config.with_stack_size(bytes);
        }

        let handle = process::spawn(config, process)?;
        self.processes.push(handle);
        self.topology.add(node);
        Ok(())
    }

    /// Take over the processes of a sub-network
    pub fn absorb(&mut self, sub: Network) {
        self.processes.extend(sub.processes);
        self.topology.merge(&sub.name, sub.topology);
    }

    /// Wiring of every process in the network
    pub fn topology(&self) -> &Topology {
        &self.topology
    }

    /// Check that every feedback cycle carries a seed
    pub fn validate(&self) -> Result<()> {
        self.topology.validate()
    }

    /// Number of processes
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    /// Whether the network has no processes
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// Number of processes that have not stopped
    pub fn running(&self) -> usize {
        self.processes.iter().filter(|p| !p.is_finished()).count()
    }

    /// Wait for every process to stop
    ///
    /// Returns the first error any process stopped with. Blocks forever
    /// unless the network has been cut off from its callers.
    pub fn join(self) -> Result<()> {
        let mut first_err = None;
        for handle in self.processes {
            if let Err(e) = handle.join() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
