use crate::error::{Result, WireError};
use crate::frame::Frame;
use crate::kind;
use crate::settings::{Axis, ChannelSettings, OutputFlags};

/// Wire size of a [`ChannelSettings`] payload: power (1) + flags (1).
pub const SETTINGS_SIZE: usize = 2;

/// Wire size of a speed or diagnostic payload.
pub const WORD_SIZE: usize = 4;

/// Decoded telemetry produced from one accepted frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TelemetryEvent {
    /// Output settings report for one axis.
    Settings {
        axis: Axis,
        settings: ChannelSettings,
    },
    /// Speed readback for one axis.
    Speed { axis: Axis, value: u32 },
    /// Generic diagnostic word.
    Diagnostic(u32),
}

/// Decode a complete frame against the fixed message-kind table.
///
/// A recognized kind with the wrong payload size is rejected with
/// [`WireError::PayloadSizeMismatch`]; an unknown kind with
/// [`WireError::UnrecognizedKind`]. Rejected frames are the caller's to log
/// and drop — they are never partially applied.
pub fn decode(frame: &Frame) -> Result<TelemetryEvent> {
    match frame.kind {
        kind::PITCH_SETTINGS => decode_settings(Axis::Pitch, frame),
        kind::ROLL_SETTINGS => decode_settings(Axis::Roll, frame),
        kind::PITCH_SPEED => Ok(TelemetryEvent::Speed {
            axis: Axis::Pitch,
            value: decode_word(frame)?,
        }),
        kind::ROLL_SPEED => Ok(TelemetryEvent::Speed {
            axis: Axis::Roll,
            value: decode_word(frame)?,
        }),
        kind::DIAGNOSTIC => Ok(TelemetryEvent::Diagnostic(decode_word(frame)?)),
        other => Err(WireError::UnrecognizedKind { kind: other }),
    }
}

fn decode_settings(axis: Axis, frame: &Frame) -> Result<TelemetryEvent> {
    let payload = expect_len(frame, SETTINGS_SIZE)?;
    Ok(TelemetryEvent::Settings {
        axis,
        settings: ChannelSettings {
            power: payload[0],
            flags: OutputFlags::from_bits(payload[1]),
        },
    })
}

fn decode_word(frame: &Frame) -> Result<u32> {
    let payload = expect_len(frame, WORD_SIZE)?;
    let bytes: [u8; WORD_SIZE] = payload.try_into().unwrap_or([0; WORD_SIZE]);
    Ok(u32::from_le_bytes(bytes))
}

fn expect_len(frame: &Frame, expected: usize) -> Result<&[u8]> {
    if frame.payload.len() != expected {
        return Err(WireError::PayloadSizeMismatch {
            kind: frame.kind,
            expected,
            actual: frame.payload.len(),
        });
    }
    Ok(frame.payload.as_ref())
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;

    use super::*;

    fn frame(kind: u8, payload: &'static [u8]) -> Frame {
        Frame::new(kind, Bytes::from_static(payload))
    }

    #[test]
    fn pitch_settings_report() {
        let event = decode(&frame(b'a', &[0x01, 0x00])).unwrap();
        assert_eq!(
            event,
            TelemetryEvent::Settings {
                axis: Axis::Pitch,
                settings: ChannelSettings {
                    power: 1,
                    flags: OutputFlags::from_bits(0),
                },
            }
        );
    }

    #[test]
    fn roll_settings_report_with_flags() {
        let event = decode(&frame(b'c', &[0x80, 0x05])).unwrap();
        let TelemetryEvent::Settings { axis, settings } = event else {
            panic!("expected settings event");
        };
        assert_eq!(axis, Axis::Roll);
        assert_eq!(settings.power, 0x80);
        assert!(settings.flags.contains(OutputFlags::REVERSE));
        assert!(settings.flags.contains(OutputFlags::DISABLED));
        assert!(!settings.flags.contains(OutputFlags::USE_TRANSFER_CURVE));
    }

    #[test]
    fn pitch_speed_readback_little_endian() {
        let event = decode(&frame(b'b', &[0x00, 0x01, 0x00, 0x00])).unwrap();
        assert_eq!(
            event,
            TelemetryEvent::Speed {
                axis: Axis::Pitch,
                value: 256,
            }
        );

        let event = decode(&frame(b'b', &[0x00, 0x00, 0x01, 0x00])).unwrap();
        assert_eq!(
            event,
            TelemetryEvent::Speed {
                axis: Axis::Pitch,
                value: 0x0001_0000,
            }
        );
    }

    #[test]
    fn roll_speed_readback() {
        let event = decode(&frame(b'd', &[0x40, 0x00, 0x00, 0x00])).unwrap();
        assert_eq!(
            event,
            TelemetryEvent::Speed {
                axis: Axis::Roll,
                value: 64,
            }
        );
    }

    #[test]
    fn diagnostic_word() {
        let event = decode(&frame(b'i', &[0xEF, 0xBE, 0xAD, 0xDE])).unwrap();
        assert_eq!(event, TelemetryEvent::Diagnostic(0xDEAD_BEEF));
    }

    #[test]
    fn settings_size_mismatch_rejected() {
        let err = decode(&frame(b'a', &[0x01, 0x00, 0x00])).unwrap_err();
        assert!(matches!(
            err,
            WireError::PayloadSizeMismatch {
                kind: b'a',
                expected: 2,
                actual: 3,
            }
        ));
    }

    #[test]
    fn speed_size_mismatch_rejected() {
        let err = decode(&frame(b'd', &[0x40, 0x00])).unwrap_err();
        assert!(matches!(err, WireError::PayloadSizeMismatch { .. }));
    }

    #[test]
    fn unrecognized_kind_rejected() {
        let err = decode(&frame(b'z', &[])).unwrap_err();
        assert!(matches!(err, WireError::UnrecognizedKind { kind: b'z' }));
    }
}
