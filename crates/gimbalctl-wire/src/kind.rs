//! Message-kind bytes.
//!
//! Lowercase kinds carry get/report traffic, uppercase kinds carry set
//! commands. `STORE_TO_FLASH` is the single zero-payload action kind.

/// Pitch output settings report (2-byte payload). Sent with an empty payload
/// to request the report.
pub const PITCH_SETTINGS: u8 = b'a';

/// Pitch speed readback (4-byte little-endian payload).
pub const PITCH_SPEED: u8 = b'b';

/// Roll output settings report (2-byte payload). Sent with an empty payload
/// to request the report.
pub const ROLL_SETTINGS: u8 = b'c';

/// Roll speed readback (4-byte little-endian payload).
pub const ROLL_SPEED: u8 = b'd';

/// Generic diagnostic word (4-byte little-endian payload).
pub const DIAGNOSTIC: u8 = b'i';

/// Set pitch output settings (2-byte payload).
pub const SET_PITCH_SETTINGS: u8 = b'A';

/// Set roll output settings (2-byte payload).
pub const SET_ROLL_SETTINGS: u8 = b'C';

/// Set pitch speed (4-byte little-endian payload).
pub const SET_PITCH_SPEED: u8 = b'B';

/// Set roll speed (4-byte little-endian payload). The write pair of the
/// `ROLL_SPEED` readback.
pub const SET_ROLL_SPEED: u8 = b'D';

/// Store the current settings to persistent memory (zero-length payload).
pub const STORE_TO_FLASH: u8 = b'W';

/// Returns a human-readable name for a kind byte.
pub fn kind_name(kind: u8) -> &'static str {
    match kind {
        PITCH_SETTINGS => "PITCH_SETTINGS",
        PITCH_SPEED => "PITCH_SPEED",
        ROLL_SETTINGS => "ROLL_SETTINGS",
        ROLL_SPEED => "ROLL_SPEED",
        DIAGNOSTIC => "DIAGNOSTIC",
        SET_PITCH_SETTINGS => "SET_PITCH_SETTINGS",
        SET_ROLL_SETTINGS => "SET_ROLL_SETTINGS",
        SET_PITCH_SPEED => "SET_PITCH_SPEED",
        SET_ROLL_SPEED => "SET_ROLL_SPEED",
        STORE_TO_FLASH => "STORE_TO_FLASH",
        _ => "UNKNOWN",
    }
}
