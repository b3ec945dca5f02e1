use bytes::Bytes;

/// Frame header: kind (1) + payload length (1) = 2 bytes.
pub const HEADER_SIZE: usize = 2;

/// Fixed capacity of the controller's message buffer. A header declaring a
/// longer payload is corrupt by definition.
pub const MAX_PAYLOAD: usize = 32;

/// One complete protocol unit: kind tag plus fully reassembled payload.
///
/// Frames are transient: the parser creates them and the dispatcher consumes
/// them immediately. A frame never exists with a partial payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Single-byte tag identifying the frame's semantic type and payload layout.
    pub kind: u8,
    /// The payload, exactly as many bytes as the header declared.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(kind: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            kind,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}
