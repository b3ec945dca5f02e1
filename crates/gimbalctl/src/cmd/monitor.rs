use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use gimbalctl_link::LinkEvent;
use gimbalctl_wire::{Axis, Command};

use crate::cmd::MonitorArgs;
use crate::exit::{link_error, CliError, CliResult, INTERNAL, SUCCESS};
use crate::output::{print_event, OutputFormat};
use gimbalctl::session::Session;

const POLL_INTERVAL: Duration = Duration::from_millis(200);

pub fn run(args: MonitorArgs, format: OutputFormat) -> CliResult<i32> {
    let mut session = Session::connect(&args.port);

    if args.request_settings {
        session.send(&Command::GetSettings(Axis::Pitch));
        session.send(&Command::GetSettings(Axis::Roll));
    }

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    while running.load(Ordering::SeqCst) {
        match session.poll_event(POLL_INTERVAL) {
            Some(LinkEvent::Telemetry(event)) => print_event(&event, format),
            Some(LinkEvent::Error(err)) => return Err(link_error("link failed", err)),
            Some(LinkEvent::Closed) => break,
            None => {}
        }
    }

    session
        .disconnect()
        .map_err(|err| link_error("disconnect failed", err))?;
    Ok(SUCCESS)
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}
