use gimbalctl_wire::Command;

use crate::cmd::set::SEND_SETTLE;
use crate::cmd::{settle, SpeedArgs};
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::OutputFormat;
use gimbalctl::session::Session;

pub fn run(args: SpeedArgs, _format: OutputFormat) -> CliResult<i32> {
    let mut session = Session::connect(&args.port);
    session.send(&Command::SetSpeed(args.axis.into(), args.value));
    settle(&mut session, SEND_SETTLE)?;

    session
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;
    Ok(SUCCESS)
}
