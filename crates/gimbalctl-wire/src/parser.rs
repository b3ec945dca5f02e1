use bytes::{Buf, BytesMut};
use tracing::warn;

use crate::frame::{Frame, HEADER_SIZE, MAX_PAYLOAD};
use crate::kind::kind_name;

/// Extra pull attempts a partially received payload may span before the
/// receive queue is flushed. Each attempt corresponds to one outer read
/// cycle (~110 ms), so late payload bytes get roughly two cycles of grace.
const PAYLOAD_RETRY_BUDGET: u8 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    AwaitingHeader,
    AwaitingPayload { kind: u8, len: usize, retries: u8 },
}

/// Stateful pull-parser that reassembles complete frames from the receive
/// queue.
///
/// One instance per link; the reassembly counters live in the parser value,
/// never in process-wide state, so independent links parse independently.
///
/// Recovery from a corrupted header or a stalled payload is a full flush of
/// the receive queue (resync): crude, but the peer is not expected to
/// interleave a malformed frame with a well-formed one.
#[derive(Debug)]
pub struct FrameParser {
    state: ParserState,
}

impl Default for FrameParser {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameParser {
    pub fn new() -> Self {
        Self {
            state: ParserState::AwaitingHeader,
        }
    }

    /// Drop any partial frame and return to the initial state. Called on
    /// reconnect.
    pub fn reset(&mut self) {
        self.state = ParserState::AwaitingHeader;
    }

    /// Extract the next complete frame from `rx`, if one is fully buffered.
    ///
    /// Call repeatedly until it returns `None`. Header and payload bytes are
    /// consumed from the front of `rx`; on detected corruption or stall the
    /// entire queue is discarded and parsing re-aligns on the next header.
    pub fn try_extract(&mut self, rx: &mut BytesMut) -> Option<Frame> {
        match self.state {
            ParserState::AwaitingHeader => {
                if rx.len() < HEADER_SIZE {
                    return None;
                }
                let kind = rx[0];
                let len = rx[1] as usize;
                rx.advance(HEADER_SIZE);

                if len > MAX_PAYLOAD {
                    warn!(
                        kind = kind_name(kind),
                        len, "corrupted header, flushing receive queue"
                    );
                    rx.clear();
                    return None;
                }

                if rx.len() >= len {
                    let payload = rx.split_to(len).freeze();
                    return Some(Frame { kind, payload });
                }

                self.state = ParserState::AwaitingPayload {
                    kind,
                    len,
                    retries: 0,
                };
                None
            }
            ParserState::AwaitingPayload { kind, len, retries } => {
                if rx.len() >= len {
                    self.state = ParserState::AwaitingHeader;
                    let payload = rx.split_to(len).freeze();
                    return Some(Frame { kind, payload });
                }

                if retries >= PAYLOAD_RETRY_BUDGET {
                    warn!(
                        kind = kind_name(kind),
                        want = len,
                        have = rx.len(),
                        "payload stall, flushing receive queue"
                    );
                    rx.clear();
                    self.state = ParserState::AwaitingHeader;
                } else {
                    self.state = ParserState::AwaitingPayload {
                        kind,
                        len,
                        retries: retries + 1,
                    };
                }
                None
            }
        }
    }
}
