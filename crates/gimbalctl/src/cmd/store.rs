use gimbalctl_wire::{Axis, Command};

use crate::cmd::set::{channel_settings, SEND_SETTLE};
use crate::cmd::{settle, StoreArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_settings, OutputFormat};
use gimbalctl::session::Session;

pub fn run(args: StoreArgs, format: OutputFormat) -> CliResult<i32> {
    let (pitch, roll) = channel_settings(&args.settings);

    let mut session = Session::connect(&args.settings.port);

    // Store-to-flash persists whatever the controller currently holds, so
    // both axes are written first.
    session.send(&Command::SetSettings(Axis::Pitch, pitch));
    session.send(&Command::SetSettings(Axis::Roll, roll));
    session.send(&Command::StoreToFlash);
    settle(&mut session, SEND_SETTLE)?;

    print_settings(&[(Axis::Pitch, pitch), (Axis::Roll, roll)], format);

    session
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;
    Ok(SUCCESS)
}
