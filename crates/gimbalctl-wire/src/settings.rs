/// One of the two stabilized axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Pitch,
    Roll,
}

impl Axis {
    /// Stable index for per-axis storage (pitch first).
    pub fn index(self) -> usize {
        match self {
            Axis::Pitch => 0,
            Axis::Roll => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Axis::Pitch => "pitch",
            Axis::Roll => "roll",
        }
    }
}

/// Per-output flag bits reported and accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputFlags(u8);

impl OutputFlags {
    /// Reverse the output direction.
    pub const REVERSE: u8 = 0x01;
    /// Apply the transfer curve to the output.
    pub const USE_TRANSFER_CURVE: u8 = 0x02;
    /// Disable the output entirely.
    pub const DISABLED: u8 = 0x04;

    /// Build from the raw wire byte.
    pub fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw wire byte.
    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn contains(self, flag: u8) -> bool {
        self.0 & flag != 0
    }

    pub fn set(&mut self, flag: u8, on: bool) {
        if on {
            self.0 |= flag;
        } else {
            self.0 &= !flag;
        }
    }
}

/// Output configuration for one axis.
///
/// Long-lived on the host side: the session mirror holds one per axis and
/// overwrites it wholesale on each accepted settings report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelSettings {
    /// Output power, 0–255.
    pub power: u8,
    pub flags: OutputFlags,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        // Power-on defaults of the controller.
        Self {
            power: 1,
            flags: OutputFlags::default(),
        }
    }
}
