use std::time::{Duration, Instant};

use gimbalctl_link::LinkEvent;
use gimbalctl_wire::{Axis, Command, TelemetryEvent};

use crate::cmd::GetArgs;
use crate::exit::{link_error, CliError, CliResult, FAILURE, SUCCESS, TIMEOUT};
use crate::output::{print_settings, OutputFormat};
use gimbalctl::session::Session;

pub fn run(args: GetArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = Session::connect(&args.port);

    session.send(&Command::GetSettings(Axis::Pitch));
    session.send(&Command::GetSettings(Axis::Roll));

    let deadline = Instant::now() + Duration::from_millis(args.timeout);
    let mut reported = [false; 2];

    while !(reported[0] && reported[1]) {
        let now = Instant::now();
        if now >= deadline {
            return Err(CliError::new(
                TIMEOUT,
                "no settings report from controller",
            ));
        }
        match session.poll_event(deadline - now) {
            Some(LinkEvent::Telemetry(TelemetryEvent::Settings { axis, .. })) => {
                reported[axis.index()] = true;
            }
            Some(LinkEvent::Telemetry(_)) | None => {}
            Some(LinkEvent::Error(err)) => return Err(link_error("link failed", err)),
            Some(LinkEvent::Closed) => {
                return Err(CliError::new(FAILURE, "link closed unexpectedly"));
            }
        }
    }

    print_settings(
        &[
            (Axis::Pitch, session.settings(Axis::Pitch)),
            (Axis::Roll, session.settings(Axis::Roll)),
        ],
        format,
    );

    session
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;
    Ok(SUCCESS)
}
