use std::time::{Duration, Instant};

use clap::{Args, Subcommand};
use gimbalctl_link::LinkEvent;

use crate::exit::{link_error, CliError, CliResult, FAILURE};
use crate::output::OutputFormat;
use gimbalctl::session::Session;

pub mod get;
pub mod monitor;
pub mod ports;
pub mod set;
pub mod speed;
pub mod store;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List serial ports on this host.
    Ports(PortsArgs),
    /// Read back the output settings for both axes.
    Get(GetArgs),
    /// Write the output settings for both axes.
    Set(SetArgs),
    /// Set the movement speed for one axis.
    Speed(SpeedArgs),
    /// Write the output settings for both axes, then store them to flash.
    Store(StoreArgs),
    /// Connect and print decoded telemetry until interrupted.
    Monitor(MonitorArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Ports(args) => ports::run(args, format),
        Command::Get(args) => get::run(args, format),
        Command::Set(args) => set::run(args, format),
        Command::Speed(args) => speed::run(args, format),
        Command::Store(args) => store::run(args, format),
        Command::Monitor(args) => monitor::run(args, format),
    }
}

#[derive(Args, Debug, Default)]
pub struct PortsArgs {}

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Serial port (e.g. /dev/ttyUSB0).
    pub port: String,
    /// Maximum time to wait for both settings reports, in milliseconds.
    #[arg(long, default_value = "2000")]
    pub timeout: u64,
}

/// Per-axis output settings shared by `set` and `store`.
#[derive(Args, Debug)]
pub struct SettingsArgs {
    /// Serial port (e.g. /dev/ttyUSB0).
    pub port: String,

    /// Pitch output power (0-255).
    #[arg(long, default_value = "1")]
    pub pitch_power: u8,
    /// Reverse the pitch output direction.
    #[arg(long)]
    pub pitch_reverse: bool,
    /// Apply the transfer curve to the pitch output.
    #[arg(long)]
    pub pitch_curve: bool,
    /// Disable the pitch output.
    #[arg(long)]
    pub pitch_disable: bool,

    /// Roll output power (0-255).
    #[arg(long, default_value = "1")]
    pub roll_power: u8,
    /// Reverse the roll output direction.
    #[arg(long)]
    pub roll_reverse: bool,
    /// Apply the transfer curve to the roll output.
    #[arg(long)]
    pub roll_curve: bool,
    /// Disable the roll output.
    #[arg(long)]
    pub roll_disable: bool,
}

#[derive(Args, Debug)]
pub struct SetArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug)]
pub struct SpeedArgs {
    /// Serial port (e.g. /dev/ttyUSB0).
    pub port: String,
    /// Axis to set.
    #[arg(long, value_enum)]
    pub axis: AxisArg,
    /// Speed magnitude.
    #[arg(long)]
    pub value: u32,
}

#[derive(Args, Debug)]
pub struct StoreArgs {
    #[command(flatten)]
    pub settings: SettingsArgs,
}

#[derive(Args, Debug)]
pub struct MonitorArgs {
    /// Serial port (e.g. /dev/ttyUSB0).
    pub port: String,
    /// Request both settings reports on connect.
    #[arg(long)]
    pub request_settings: bool,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum AxisArg {
    Pitch,
    Roll,
}

impl From<AxisArg> for gimbalctl_wire::Axis {
    fn from(axis: AxisArg) -> Self {
        match axis {
            AxisArg::Pitch => gimbalctl_wire::Axis::Pitch,
            AxisArg::Roll => gimbalctl_wire::Axis::Roll,
        }
    }
}

/// Pump link events for `window`, failing fast on a fatal link error. Gives
/// queued commands time to hit the wire and surfaces write timeouts.
pub(crate) fn settle(session: &mut Session, window: Duration) -> CliResult<()> {
    let deadline = Instant::now() + window;
    loop {
        let now = Instant::now();
        if now >= deadline {
            return Ok(());
        }
        match session.poll_event(deadline - now) {
            Some(LinkEvent::Error(err)) => return Err(link_error("link failed", err)),
            Some(LinkEvent::Closed) => {
                return Err(CliError::new(FAILURE, "link closed unexpectedly"));
            }
            Some(LinkEvent::Telemetry(_)) | None => {}
        }
    }
}
