//! Single-input processes

use super::Process;
use crate::comm::{ChannelId, Receiver, Sender};
use crate::{Result, Value};

/// One-place buffer: forwards every value unchanged
///
/// Decouples a producer from a consumer by exactly one value.
#[derive(Debug)]
pub struct Id {
    input: Receiver<Value>,
    output: Sender<Value>,
}

impl Id {
    pub fn new(input: Receiver<Value>, output: Sender<Value>) -> Self {
        Self { input, output }
    }
}

impl Process for Id {
    fn name(&self) -> &'static str {
        "id"
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
            self.output.send(v)?;
        }
    }
}

/// Successor: outputs each input plus one
#[derive(Debug)]
pub struct Succ {
    input: Receiver<Value>,
    output: Sender<Value>,
}

impl Succ {
    pub fn new(input: Receiver<Value>, output: Sender<Value>) -> Self {
        Self { input, output }
    }
}

impl Process for Succ {
    fn name(&self) -> &'static str {
        "succ"
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
            self.output.send(v.wrapping_add(1))?;
        }
    }
}

/// Consumes and discards every value
#[derive(Debug)]
pub struct Sink {
    input: Receiver<Value>,
}

impl Sink {
    pub fn new(input: Receiver<Value>) -> Self {
        Self { input }
    }
}

impl Process for Sink {
    fn name(&self) -> &'static str {
        "sink"
    }

    fn inputs(&self) -> Vec<ChannelId> {
        vec![self.input.id()]
    }

    fn outputs(&self) -> Vec<ChannelId> {
        Vec::new()
    }

    fn run(self) -> Result<()> {
        loop {
            self.input.recv()?;
        }
    }
}

/// Drops the first value, then forwards the rest of the stream forever
#[derive(Debug)]
pub struct Tail {
    input: Receiver<Value>,
    output: Sender<Value>,
}

impl Tail {
    pub fn new(input: Receiver<Value>, output: Sender<Value>) -> Self {
        Self { input, output }
    }
}

impl Process for Tail {
    fn name(&self) -> &'static str {
        "tail"
    }

    fn inputs(&self) -> Vec<ChannelId> {
        vec![self.input.id()]
    }

    fn outputs(&self) -> Vec<ChannelId> {
        vec![self.output.id()]
    }

    fn run(self) -> Result<()> {
        self.input.recv()?;
        loop {
            let v = self.input.recv()?;
            self.output.send(v)?;
        }
    }
}

/// Emits `n` before reading anything, then forwards its input
///
/// This is the seed of a feedback cycle: it lets the first read on the
/// cycle succeed.
#[derive(Debug)]
pub struct Prefix {
    n: Value,
    input: Receiver<Value>,
    output: Sender<Value>,
}

impl Prefix {
    pub fn new(n: Value, input: Receiver<Value>, output: Sender<Value>) -> Self {
        Self { n, input, output }
    }
}

impl Process for Prefix {
    fn name(&self) -> &'static str {
        "prefix"
    }

    fn inputs(&self) -> Vec<ChannelId> {
        vec![self.input.id()]
    }

    fn outputs(&self) -> Vec<ChannelId> {
        vec![self.output.id()]
    }

    fn is_seed(&self) -> bool {
        true
    }

    fn run(self) -> Result<()> {
        self.output.send(self.n)?;
        loop {
            let v = self.input.recv()?;
            self.output.send(v)?;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::comm::channel;
    use crate::process::{spawn, ProcessConfig};
    use std::time::Duration;

    const TIMEOUT: Duration = Duration::from_secs(5);

    fn start<P: Process>(process: P) {
        spawn(ProcessConfig::new(process.name()), process).unwrap();
    }

    fn feed(tx: Sender<Value>, values: Vec<Value>) {
        std::thread::spawn(move || {
            for v in values {
                if tx.send(v).is_err() {
                    break;
                }
            }
        });
    }

    fn take(rx: &Receiver<Value>, n: usize) -> Vec<Value> {
        (0..n)
            .map(|_| rx.recv_timeout(TIMEOUT).unwrap().expect("timed out"))
            .collect()
    }

    #[test]
    fn test_id_forwards_unchanged() {
        let (in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        start(Id::new(in_rx, out_tx));
        feed(in_tx, vec![3, -1, 7]);
        assert_eq!(take(&out_rx, 3), vec![3, -1, 7]);
    }

    #[test]
    fn test_id_buffers_one_value() {
        let (in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        start(Id::new(in_rx, out_tx));

        // Id holds the first value while its consumer is busy, so the
        // producer is free again after one rendezvous.
        in_tx.send_timeout(1, TIMEOUT).unwrap();
        assert!(matches!(
            in_tx.send_timeout(2, Duration::from_millis(50)),
            Err(crate::Error::Timeout(_))
        ));
        assert_eq!(out_rx.recv_timeout(TIMEOUT).unwrap(), Some(1));
    }

    #[test]
    fn test_succ_adds_one() {
        let (in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        start(Succ::new(in_rx, out_tx));
        feed(in_tx, vec![0, 41, Value::MAX]);
        assert_eq!(take(&out_rx, 3), vec![1, 42, Value::MIN]);
    }

    #[test]
    fn test_sink_consumes_everything() {
        let (in_tx, in_rx) = channel();
        start(Sink::new(in_rx));
        for v in 0..10 {
            in_tx.send_timeout(v, TIMEOUT).unwrap();
        }
    }

    #[test]
    fn test_tail_drops_first_then_forwards_forever() {
        let (in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        start(Tail::new(in_rx, out_tx));
        feed(in_tx, (10..20).collect());
        assert_eq!(take(&out_rx, 9), (11..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_prefix_emits_seed_without_input() {
        let (_in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        start(Prefix::new(5, in_rx, out_tx));
        assert_eq!(out_rx.recv_timeout(TIMEOUT).unwrap(), Some(5));
    }

    #[test]
    fn test_prefix_then_forwards() {
        let (in_tx, in_rx) = channel();
        let (out_tx, out_rx) = channel();
        start(Prefix::new(-1, in_rx, out_tx));
        feed(in_tx, vec![8, 9]);
        assert_eq!(take(&out_rx, 3), vec![-1, 8, 9]);
    }

    #[test]
    fn test_only_prefix_is_seed() {
        let (_tx, rx) = channel();
        let (tx, _rx) = channel();
        assert!(Prefix::new(0, rx, tx).is_seed());

        let (_tx, rx) = channel();
        let (tx, _rx) = channel();
        assert!(!Id::new(rx, tx).is_seed());
    }
}
