//! Communication primitives for process networks
//!
//! Every link between two processes is a zero-capacity rendezvous channel
//! with exactly one sender and one receiver.

mod channel;

pub use channel::{channel, select, ChannelId, Ready, Receiver, Sender};
