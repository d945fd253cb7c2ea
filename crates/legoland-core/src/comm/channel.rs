//! Rendezvous channels for inter-process communication
//!
//! Wrapper around a zero-capacity crossbeam-channel. A send blocks until the
//! matching receive happens and vice versa. Endpoints are deliberately not
//! `Clone`, so every channel has one writer and one reader.

use crossbeam_channel::{self as cc, RecvTimeoutError, SendTimeoutError, TryRecvError};
use serde::Serialize;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use crate::{Error, Result};

static NEXT_CHANNEL_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one channel; shared by its sender and receiver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChannelId(u64);

impl ChannelId {
    fn next() -> Self {
        Self(NEXT_CHANNEL_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ch{}", self.0)
    }
}

/// Sending end of a rendezvous channel
#[derive(Debug)]
pub struct Sender<T> {
    inner: cc::Sender<T>,
    id: ChannelId,
}

impl<T> Sender<T> {
    /// Send a value, blocking until the receiver takes it
    #[inline]
    pub fn send(&self, value: T) -> Result<()> {
        self.inner.send(value).map_err(|_| Error::ChannelClosed)
    }

    /// Send a value, giving up if no receiver pairs with it in time
    pub fn send_timeout(&self, value: T, timeout: Duration) -> Result<()> {
        match self.inner.send_timeout(value, timeout) {
            Ok(()) => Ok(()),
            Err(SendTimeoutError::Timeout(_)) => Err(Error::Timeout(format!(
                "no receiver on {} after {:?}",
                self.id, timeout
            ))),
            Err(SendTimeoutError::Disconnected(_)) => Err(Error::ChannelClosed),
        }
    }

    /// Channel this sender writes to
    #[inline]
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

/// Receiving end of a rendezvous channel
#[derive(Debug)]
pub struct Receiver<T> {
    inner: cc::Receiver<T>,
    id: ChannelId,
}

impl<T> Receiver<T> {
    /// Receive a value, blocking until the sender offers one
    #[inline]
    pub fn recv(&self) -> Result<T> {
        self.inner.recv().map_err(|_| Error::ChannelClosed)
    }

    /// Try to receive without blocking
    ///
    /// With zero capacity this only succeeds if a sender is already blocked
    /// waiting to hand over a value.
    #[inline]
    pub fn try_recv(&self) -> Result<Option<T>> {
        match self.inner.try_recv() {
            Ok(v) => Ok(Some(v)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Disconnected) => Err(Error::ChannelClosed),
        }
    }

    /// Receive with a timeout
    #[inline]
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<T>> {
        match self.inner.recv_timeout(timeout) {
            Ok(v) => Ok(Some(v)),
            Err(RecvTimeoutError::Timeout) => Ok(None),
            Err(RecvTimeoutError::Disconnected) => Err(Error::ChannelClosed),
        }
    }

    /// Blocking iterator over received values; ends when the sender is dropped
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = T> + '_ {
        self.inner.iter()
    }

    /// Channel this receiver reads from
    #[inline]
    pub fn id(&self) -> ChannelId {
        self.id
    }
}

impl<T> IntoIterator for Receiver<T> {
    type Item = T;
    type IntoIter = cc::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Create a rendezvous channel
pub fn channel<T>() -> (Sender<T>, Receiver<T>) {
    let (tx, rx) = cc::bounded(0);
    let id = ChannelId::next();
    (Sender { inner: tx, id }, Receiver { inner: rx, id })
}

/// Which of two receivers produced a value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ready<T> {
    First(T),
    Second(T),
}

/// Block until either receiver yields a value
///
/// If both are ready, one is chosen at random. Fails only if the chosen
/// channel has been disconnected.
pub fn select<T>(first: &Receiver<T>, second: &Receiver<T>) -> Result<Ready<T>> {
    let mut sel = cc::Select::new();
    let first_idx = sel.recv(&first.inner);
    let second_idx = sel.recv(&second.inner);

    let op = sel.select();
    if op.index() == first_idx {
        op.recv(&first.inner)
            .map(Ready::First)
            .map_err(|_| Error::ChannelClosed)
    } else {
        debug_assert_eq!(op.index(), second_idx);
        op.recv(&second.inner)
            .map(Ready::Second)
            .map_err(|_| Error::ChannelClosed)
    }
}
