/// Errors raised while decoding a complete frame.
///
/// Framing-level corruption (oversized header, stalled payload) never reaches
/// this type: the parser recovers locally by flushing the receive queue.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// A recognized kind carried a payload of the wrong size.
    #[error("payload size mismatch for kind '{}' (expected {expected} bytes, got {actual})", *kind as char)]
    PayloadSizeMismatch {
        kind: u8,
        expected: usize,
        actual: usize,
    },

    /// The kind byte is not in the message table.
    #[error("unrecognized message kind {kind:#04x}")]
    UnrecognizedKind { kind: u8 },
}

pub type Result<T> = std::result::Result<T, WireError>;
