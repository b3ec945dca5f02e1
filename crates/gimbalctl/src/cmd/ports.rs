use gimbalctl_link::available_ports;

use crate::cmd::PortsArgs;
use crate::exit::{link_error, CliResult, SUCCESS};
use crate::output::{print_ports, OutputFormat};

pub fn run(_args: PortsArgs, format: OutputFormat) -> CliResult<i32> {
    let ports = available_ports().map_err(|err| link_error("port enumeration failed", err))?;

    if ports.is_empty() {
        eprintln!("no serial ports detected");
    }
    print_ports(&ports, format);
    Ok(SUCCESS)
}
