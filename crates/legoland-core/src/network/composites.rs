//! Composite networks that generate integer sequences
//!
//! Every constructor starts its processes before returning. Callers read the
//! sequence from the receiving end of `out`; dropping that receiver lets the
//! network wind down.

use super::Network;
use crate::comm::{channel, Receiver, Sender};
use crate::process::{Delta, Plus, Prefix, Succ, Tail};
use crate::{Result, Value};

/// Natural numbers: 0, 1, 2, 3, ...
///
/// ```text
/// Prefix(0) --x--> Delta --out-->
///     ^              |
///     z              y
///     +---- Succ <---+
/// ```
pub fn nos(out: Sender<Value>) -> Result<Network> {
    let (x_tx, x_rx) = channel();
    let (y_tx, y_rx) = channel();
    let (z_tx, z_rx) = channel();

    let mut net = Network::new("nos");
    net.spawn(Prefix::new(0, z_rx, x_tx))?;
    net.spawn(Delta::new(x_rx, out, y_tx))?;
    net.spawn(Succ::new(y_rx, z_tx))?;

    tracing::debug!("{}: wired {} processes", net.name(), net.len());
    Ok(net)
}

/// Running total of `input`: the k-th output is the sum of the first k+1 inputs
///
/// ```text
/// --input--> Plus --x--> Delta --out-->
///             ^            |
///             z            y
///             +- Prefix(0)-+
/// ```
pub fn int(input: Receiver<Value>, out: Sender<Value>) -> Result<Network> {
    let (x_tx, x_rx) = channel();
    let (y_tx, y_rx) = channel();
    let (z_tx, z_rx) = channel();

    let mut net = Network::new("int");
    net.spawn(Prefix::new(0, y_rx, z_tx))?;
    net.spawn(Plus::new(input, z_rx, x_tx))?;
    net.spawn(Delta::new(x_rx, out, y_tx))?;

    tracing::debug!("{}: wired {} processes", net.name(), net.len());
    Ok(net)
}

/// Sums of neighbours: the k-th output is `input[k] + input[k + 1]`
///
/// ```text
/// --input--> Delta --x--> Tail --y--> Plus --out-->
///              |                       ^
///              +----------z------------+
/// ```
pub fn pairs(input: Receiver<Value>, out: Sender<Value>) -> Result<Network> {
    let (x_tx, x_rx) = channel();
    let (y_tx, y_rx) = channel();
    let (z_tx, z_rx) = channel();

    let mut net = Network::new("pairs");
    net.spawn(Delta::new(input, x_tx, z_tx))?;
    net.spawn(Tail::new(x_rx, y_tx))?;
    net.spawn(Plus::new(y_rx, z_rx, out))?;

    tracing::debug!("{}: wired {} processes", net.name(), net.len());
    Ok(net)
}

/// Fibonacci numbers: 0, 1, 1, 2, 3, 5, ...
///
/// Both seeds sit on the one feedback cycle, so the stream starts `0, 1`
/// and `pairs` supplies every later term from the two before it.
///
/// ```text
/// Prefix(1) --b--> Prefix(0) --c--> Delta --out-->
///     ^                               |
///     a                               d
///     +----------- pairs <------------+
/// ```
pub fn fib(out: Sender<Value>) -> Result<Network> {
    let (a_tx, a_rx) = channel();
    let (b_tx, b_rx) = channel();
    let (c_tx, c_rx) = channel();
    let (d_tx, d_rx) = channel();

    let mut net = Network::new("fib");
    net.spawn(Prefix::new(1, a_rx, b_tx))?;
    net.spawn(Prefix::new(0, b_rx, c_tx))?;
    net.spawn(Delta::new(c_rx, out, d_tx))?;
    net.absorb(pairs(d_rx, a_tx)?);

    tracing::debug!("{}: wired {} processes", net.name(), net.len());
    Ok(net)
}

/// Perfect squares: 1, 4, 9, 16, ...
///
/// The running total of the naturals is the triangular numbers, and two
/// neighbouring triangular numbers add up to a square.
///
/// ```text
/// nos --x--> int --y--> pairs --out-->
/// ```
pub fn squares(out: Sender<Value>) -> Result<Network> {
    let (x_tx, x_rx) = channel();
    let (y_tx, y_rx) = channel();

    let mut net = Network::new("squares");
    net.absorb(nos(x_tx)?);
    net.absorb(int(x_rx, y_tx)?);
    net.absorb(pairs(y_rx, out)?);

    tracing::debug!("{}: wired {} processes", net.name(), net.len());
    Ok(net)
}
