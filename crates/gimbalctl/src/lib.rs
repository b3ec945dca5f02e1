//! Configuration tool for two-axis gimbal stabilizer controllers.
//!
//! gimbalctl talks to a pitch/roll stabilizer controller over a serial link
//! using a compact length-prefixed binary protocol.
//!
//! # Crate Structure
//!
//! - [`wire`] — Wire format: frames, framing state machine, decode table,
//!   command encoder
//! - [`link`] — Serial transport worker: owns the open port, runs the
//!   read/write loop, delivers decoded telemetry events

pub mod session;

/// Re-export wire format types.
pub mod wire {
    pub use gimbalctl_wire::*;
}

/// Re-export link types.
pub mod link {
    pub use gimbalctl_link::*;
}
