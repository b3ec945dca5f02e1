//! Wire format for the gimbal controller's serial telemetry protocol.
//!
//! Every message is framed with:
//! - A 1-byte message kind
//! - A 1-byte payload length (0–32)
//! - Exactly that many payload bytes
//!
//! No sync marker, no checksum, no escaping — the link is assumed reliable
//! in content, though not necessarily in timing. Multi-byte numeric fields
//! are little-endian at fixed offsets.

pub mod command;
pub mod error;
pub mod event;
pub mod frame;
pub mod kind;
pub mod parser;
pub mod settings;

pub use command::Command;
pub use error::{Result, WireError};
pub use event::{decode, TelemetryEvent};
pub use frame::{Frame, HEADER_SIZE, MAX_PAYLOAD};
pub use parser::FrameParser;
pub use settings::{Axis, ChannelSettings, OutputFlags};
