//! Merge processes: sum two inputs that arrive in any order
//!
//! All five processes share one contract: forever, read `x` from `in_x` and
//! `y` from `in_y` and send `x + y`. They differ in how they cope with not
//! knowing which input is ready first:
//!
//! - [`PlusSerial`] assumes `in_x` is always ready before `in_y`.
//! - [`PlusWrong`] picks whichever input is ready, twice, and can read the
//!   same input twice. Kept as a counter-example; it is not correct.
//! - [`PlusNaive`] enumerates both arrival orders. Correct, but the number of
//!   orders grows factorially with the number of inputs.
//! - [`PlusWg`] and [`Plus`] read both inputs concurrently and join. Correct
//!   for any number of inputs; [`Plus`] is the one the networks use.

use parking_lot::Mutex;
use std::thread;

use super::Process;
use crate::comm::{select, ChannelId, Ready, Receiver, Sender};
use crate::sync::{par, WaitGroup};
use crate::{Error, Result, Value};

macro_rules! merge_ports {
    ($name:literal) => {
        fn name(&self) -> &'static str {
            $name
        }

        fn inputs(&self) -> Vec<ChannelId> {
            vec![self.in_x.id(), self.in_y.id()]
        }

        fn outputs(&self) -> Vec<ChannelId> {
            vec![self.out.id()]
        }
    };
}

/// Sums `in_x` then `in_y`, strictly in that order
#[derive(Debug)]
pub struct PlusSerial {
    in_x: Receiver<Value>,
    in_y: Receiver<Value>,
    out: Sender<Value>,
}

impl PlusSerial {
    pub fn new(in_x: Receiver<Value>, in_y: Receiver<Value>, out: Sender<Value>) -> Self {
        Self { in_x, in_y, out }
    }
}

impl Process for PlusSerial {
    merge_ports!("plus_serial");

    fn run(self) -> Result<()> {
        loop {
            let x = self.in_x.recv()?;
            let y = self.in_y.recv()?;
            self.out.send(x.wrapping_add(y))?;
        }
    }
}

/// Broken merge: two reads from whichever input is ready
///
/// Nothing records which input was already read this round, so two values
/// from the same input can be taken. The second overwrites the first, and
/// the side that was never read counts as zero.
#[derive(Debug)]
pub struct PlusWrong {
    in_x: Receiver<Value>,
    in_y: Receiver<Value>,
    out: Sender<Value>,
}

impl PlusWrong {
    pub fn new(in_x: Receiver<Value>, in_y: Receiver<Value>, out: Sender<Value>) -> Self {
        Self { in_x, in_y, out }
    }
}

impl Process for PlusWrong {
    merge_ports!("plus_wrong");

    fn run(self) -> Result<()> {
        loop {
            let (mut x, mut y) = (0, 0);
            for _ in 0..2 {
                match select(&self.in_x, &self.in_y)? {
                    Ready::First(v) => x = v,
                    Ready::Second(v) => y = v,
                }
            }
            self.out.send(x.wrapping_add(y))?;
        }
    }
}

/// Correct merge that spells out both arrival orders
///
/// Whichever input fires first, the other one is then read unconditionally.
/// Do not extend this pattern past two inputs.
#[derive(Debug)]
pub struct PlusNaive {
    in_x: Receiver<Value>,
    in_y: Receiver<Value>,
    out: Sender<Value>,
}

impl PlusNaive {
    pub fn new(in_x: Receiver<Value>, in_y: Receiver<Value>, out: Sender<Value>) -> Self {
        Self { in_x, in_y, out }
    }
}

impl Process for PlusNaive {
    merge_ports!("plus_naive");

    fn run(self) -> Result<()> {
        loop {
            let (x, y) = match select(&self.in_x, &self.in_y)? {
                Ready::First(x) => (x, self.in_y.recv()?),
                Ready::Second(y) => (self.in_x.recv()?, y),
            };
            self.out.send(x.wrapping_add(y))?;
        }
    }
}

/// Concurrent merge joined with an explicit [`WaitGroup`]
#[derive(Debug)]
pub struct PlusWg {
    in_x: Receiver<Value>,
    in_y: Receiver<Value>,
    out: Sender<Value>,
}

impl PlusWg {
    pub fn new(in_x: Receiver<Value>, in_y: Receiver<Value>, out: Sender<Value>) -> Self {
        Self { in_x, in_y, out }
    }
}

impl Process for PlusWg {
    merge_ports!("plus_wg");

    fn run(self) -> Result<()> {
        let wg = WaitGroup::new();
        loop {
            let x = Mutex::new(Err(Error::ChannelClosed));
            let y = Mutex::new(Err(Error::ChannelClosed));
            thread::scope(|s| {
                wg.add(2);
                s.spawn(|| {
                    let _done = wg.guard();
                    *x.lock() = self.in_x.recv();
                });
                s.spawn(|| {
                    let _done = wg.guard();
                    *y.lock() = self.in_y.recv();
                });
                wg.wait();
            });
            let (x, y) = (x.into_inner()?, y.into_inner()?);
            self.out.send(x.wrapping_add(y))?;
        }
    }
}

/// Concurrent merge joined with [`par`]
#[derive(Debug)]
pub struct Plus {
    in_x: Receiver<Value>,
    in_y: Receiver<Value>,
    out: Sender<Value>,
}

impl Plus {
    pub fn new(in_x: Receiver<Value>, in_y: Receiver<Value>, out: Sender<Value>) -> Self {
        Self { in_x, in_y, out }
    }
}

impl Process for Plus {
    merge_ports!("plus");

    fn run(self) -> Result<()> {
        loop {
            let (x, y) = par(|| self.in_x.recv(), || self.in_y.recv());
            self.out.send(x?.wrapping_add(y?))?;
        }
    }
}
