//! Fan-out: copy one input onto two outputs
//!
//! Both copies are sent concurrently. Sending to `out_x` and then `out_y`
//! would force the two downstream consumers into lock-step, and deadlocks
//! when the `out_y` consumer is waiting on something the `out_x` consumer
//! produces only later.

use parking_lot::Mutex;
use std::thread;

use super::Process;
use crate::comm::{ChannelId, Receiver, Sender};
use crate::sync::{par, WaitGroup};
use crate::{Error, Result, Value};

/// Fan-out joined with an explicit [`WaitGroup`]
#[derive(Debug)]
pub struct DeltaWg {
    input: Receiver<Value>,
    out_x: Sender<Value>,
    out_y: Sender<Value>,
}

impl DeltaWg {
    pub fn new(input: Receiver<Value>, out_x: Sender<Value>, out_y: Sender<Value>) -> Self {
        Self {
            input,
            out_x,
            out_y,
        }
    }
}

impl Process for DeltaWg {
    fn name(&self) -> &'static str {
        "delta_wg"
    }

    fn inputs(&self) -> Vec<ChannelId> {
        vec![self.input.id()]
    }

    fn outputs(&self) -> Vec<ChannelId> {
        vec![self.out_x.id(), self.out_y.id()]
    }

    fn run(self) -> Result<()> {
        let wg = WaitGroup::new();
        loop {
            let v = self.input.recv()?;
            let sent_x = Mutex::new(Err(Error::ChannelClosed));
            let sent_y = Mutex::new(Err(Error::ChannelClosed));
            thread::scope(|s| {
                wg.add(2);
                s.spawn(|| {
                    let _done = wg.guard();
                    *sent_x.lock() = self.out_x.send(v);
                });
                s.spawn(|| {
                    let _done = wg.guard();
                    *sent_y.lock() = self.out_y.send(v);
                });
                wg.wait();
            });
            sent_x.into_inner()?;
            sent_y.into_inner()?;
        }
    }
}

/// Fan-out joined with [`par`]
#[derive(Debug)]
pub struct Delta {
    input: Receiver<Value>,
    out_x: Sender<Value>,
    out_y: Sender<Value>,
}

impl Delta {
    pub fn new(input: Receiver<Value>, out_x: Sender<Value>, out_y: Sender<Value>) -> Self {
        Self {
            input,
            out_x,
            out_y,
        }
    }
}

impl Process for Delta {
    fn name(&self) -> &'static str {
        "delta"
    }

    fn inputs(&self) -> Vec<ChannelId> {
        vec![self.input.id()]
    }

    fn outputs(&self) -> Vec<ChannelId> {
        vec![self.out_x.id(), self.out_y.id()]
    }

    fn run(self) -> Result<()> {
        loop {
            let v = self.input.recv()?;
            let (sent_x, sent_y) = par(|| self.out_x.send(v), || self.out_y.send(v));
            sent_x?;
            sent_y?;
        }
    }
}
