//! Serial transport worker for the gimbal controller link.
//!
//! One worker thread owns the open port and runs a bounded-latency
//! read/write loop: pending commands go out under a write deadline, incoming
//! bytes are drained into the receive queue, and complete frames are decoded
//! and delivered to the owner context over a channel, in arrival order.
//!
//! The only shared mutable state is the transmit/receive buffer pair plus a
//! stop flag, all under one lock; the lock is never held across a blocking
//! read or write.

pub mod error;
pub mod io;
pub mod worker;

pub use error::{LinkError, Result};
pub use io::{available_ports, LinkIo, SerialIo, BAUD_RATE};
pub use worker::{LinkEvent, SerialLink, DISCONNECT_TIMEOUT, READ_TIMEOUT, WRITE_TIMEOUT};
