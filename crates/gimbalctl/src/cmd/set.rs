use std::time::Duration;

use gimbalctl_wire::{Axis, ChannelSettings, Command, OutputFlags};

use crate::cmd::{settle, SetArgs, SettingsArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_settings, OutputFormat};
use gimbalctl::session::Session;

/// Window for the queued set commands to reach the wire.
pub(crate) const SEND_SETTLE: Duration = Duration::from_millis(300);

pub fn run(args: SetArgs, format: OutputFormat) -> CliResult<i32> {
    let (pitch, roll) = channel_settings(&args.settings);

    let mut session = Session::connect(&args.settings.port);
    session.send(&Command::SetSettings(Axis::Pitch, pitch));
    session.send(&Command::SetSettings(Axis::Roll, roll));
    settle(&mut session, SEND_SETTLE)?;

    print_settings(&[(Axis::Pitch, pitch), (Axis::Roll, roll)], format);

    session
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;
    Ok(SUCCESS)
}

/// Build both axes' settings from the shared CLI flags.
pub(crate) fn channel_settings(args: &SettingsArgs) -> (ChannelSettings, ChannelSettings) {
    let mut pitch = ChannelSettings {
        power: args.pitch_power,
        flags: OutputFlags::default(),
    };
    pitch.flags.set(OutputFlags::REVERSE, args.pitch_reverse);
    pitch
        .flags
        .set(OutputFlags::USE_TRANSFER_CURVE, args.pitch_curve);
    pitch.flags.set(OutputFlags::DISABLED, args.pitch_disable);

    let mut roll = ChannelSettings {
        power: args.roll_power,
        flags: OutputFlags::default(),
    };
    roll.flags.set(OutputFlags::REVERSE, args.roll_reverse);
    roll.flags
        .set(OutputFlags::USE_TRANSFER_CURVE, args.roll_curve);
    roll.flags.set(OutputFlags::DISABLED, args.roll_disable);

    (pitch, roll)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_built_from_args() {
        let args = SettingsArgs {
            port: "/dev/ttyUSB0".into(),
            pitch_power: 3,
            pitch_reverse: true,
            pitch_curve: false,
            pitch_disable: false,
            roll_power: 200,
            roll_reverse: false,
            roll_curve: true,
            roll_disable: true,
        };

        let (pitch, roll) = channel_settings(&args);
        assert_eq!(pitch.power, 3);
        assert_eq!(pitch.flags.bits(), OutputFlags::REVERSE);
        assert_eq!(roll.power, 200);
        assert_eq!(
            roll.flags.bits(),
            OutputFlags::USE_TRANSFER_CURVE | OutputFlags::DISABLED
        );
    }
}
