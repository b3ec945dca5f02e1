use bytes::{BufMut, BytesMut};

use crate::event::{SETTINGS_SIZE, WORD_SIZE};
use crate::kind;
use crate::settings::{Axis, ChannelSettings};

/// An outgoing request to the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Ask for one axis' output settings; the controller answers with a
    /// settings report.
    GetSettings(Axis),
    /// Overwrite one axis' output settings.
    SetSettings(Axis, ChannelSettings),
    /// Set the movement speed for one axis.
    SetSpeed(Axis, u32),
    /// Persist the current settings to the controller's flash.
    ///
    /// Only meaningful after `SetSettings` has been sent for both axes; that
    /// ordering is the caller's contract, not enforced here.
    StoreToFlash,
}

impl Command {
    /// The kind byte this command goes out under.
    ///
    /// Get requests reuse the lowercase report kinds with an empty payload;
    /// set commands use the uppercase kinds. Roll speed writes go out as
    /// `'D'`, the write pair of the `'d'` readback.
    pub fn kind(&self) -> u8 {
        match *self {
            Command::GetSettings(Axis::Pitch) => kind::PITCH_SETTINGS,
            Command::GetSettings(Axis::Roll) => kind::ROLL_SETTINGS,
            Command::SetSettings(Axis::Pitch, _) => kind::SET_PITCH_SETTINGS,
            Command::SetSettings(Axis::Roll, _) => kind::SET_ROLL_SETTINGS,
            Command::SetSpeed(Axis::Pitch, _) => kind::SET_PITCH_SPEED,
            Command::SetSpeed(Axis::Roll, _) => kind::SET_ROLL_SPEED,
            Command::StoreToFlash => kind::STORE_TO_FLASH,
        }
    }

    /// Append the wire encoding (header + payload) to `dst`.
    ///
    /// Multi-byte fields are written little-endian at fixed offsets; the
    /// encoding never depends on host byte order or struct layout.
    pub fn encode(&self, dst: &mut BytesMut) {
        dst.put_u8(self.kind());
        match *self {
            Command::GetSettings(_) | Command::StoreToFlash => {
                dst.put_u8(0);
            }
            Command::SetSettings(_, settings) => {
                dst.put_u8(SETTINGS_SIZE as u8);
                dst.put_u8(settings.power);
                dst.put_u8(settings.flags.bits());
            }
            Command::SetSpeed(_, value) => {
                dst.put_u8(WORD_SIZE as u8);
                dst.put_u32_le(value);
            }
        }
    }

    /// The wire encoding as a fresh buffer.
    pub fn to_bytes(&self) -> BytesMut {
        let mut dst = BytesMut::with_capacity(crate::frame::HEADER_SIZE + WORD_SIZE);
        self.encode(&mut dst);
        dst
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{decode, TelemetryEvent};
    use crate::parser::FrameParser;
    use crate::settings::OutputFlags;

    #[test]
    fn get_settings_is_header_only() {
        assert_eq!(
            Command::GetSettings(Axis::Pitch).to_bytes().as_ref(),
            &[b'a', 0]
        );
        assert_eq!(
            Command::GetSettings(Axis::Roll).to_bytes().as_ref(),
            &[b'c', 0]
        );
    }

    #[test]
    fn set_settings_encoding() {
        let mut settings = ChannelSettings {
            power: 3,
            flags: OutputFlags::default(),
        };
        settings.flags.set(OutputFlags::REVERSE, true);

        assert_eq!(
            Command::SetSettings(Axis::Pitch, settings).to_bytes().as_ref(),
            &[b'A', 2, 3, 0x01]
        );
        assert_eq!(
            Command::SetSettings(Axis::Roll, settings).to_bytes().as_ref(),
            &[b'C', 2, 3, 0x01]
        );
    }

    #[test]
    fn set_speed_encoding_little_endian() {
        assert_eq!(
            Command::SetSpeed(Axis::Pitch, 0x0102_0304).to_bytes().as_ref(),
            &[b'B', 4, 0x04, 0x03, 0x02, 0x01]
        );
        // Roll speed goes out as 'D', not the settings kind 'C'.
        assert_eq!(
            Command::SetSpeed(Axis::Roll, 64).to_bytes().as_ref(),
            &[b'D', 4, 0x40, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn store_to_flash_is_header_only() {
        assert_eq!(Command::StoreToFlash.to_bytes().as_ref(), &[b'W', 0]);
    }

    #[test]
    fn repeated_encodes_are_byte_identical() {
        let settings = ChannelSettings {
            power: 9,
            flags: OutputFlags::from_bits(0x06),
        };
        let command = Command::SetSettings(Axis::Roll, settings);
        assert_eq!(command.to_bytes(), command.to_bytes());

        let get = Command::GetSettings(Axis::Roll);
        assert_eq!(get.to_bytes(), get.to_bytes());
    }

    #[test]
    fn set_settings_roundtrips_through_report_decode() {
        // The set payload layout matches the report payload layout, so an
        // echoed settings frame decodes back to the same value.
        let settings = ChannelSettings {
            power: 0x42,
            flags: OutputFlags::from_bits(OutputFlags::USE_TRANSFER_CURVE),
        };

        for (axis, report_kind) in [(Axis::Pitch, b'a'), (Axis::Roll, b'c')] {
            let mut wire = Command::SetSettings(axis, settings).to_bytes();
            wire[0] = report_kind;

            let mut parser = FrameParser::new();
            let frame = parser.try_extract(&mut wire).unwrap();
            let event = decode(&frame).unwrap();
            assert_eq!(event, TelemetryEvent::Settings { axis, settings });
        }
    }

    #[test]
    fn set_speed_roundtrips_through_readback_decode() {
        for (axis, report_kind) in [(Axis::Pitch, b'b'), (Axis::Roll, b'd')] {
            let mut wire = Command::SetSpeed(axis, 123_456).to_bytes();
            wire[0] = report_kind;

            let mut parser = FrameParser::new();
            let frame = parser.try_extract(&mut wire).unwrap();
            let event = decode(&frame).unwrap();
            assert_eq!(
                event,
                TelemetryEvent::Speed {
                    axis,
                    value: 123_456,
                }
            );
        }
    }
}
