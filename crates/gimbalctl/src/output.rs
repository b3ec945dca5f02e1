use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use gimbalctl_wire::{Axis, ChannelSettings, OutputFlags, TelemetryEvent};
use serde::Serialize;
use serialport::{SerialPortInfo, SerialPortType};

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

#[derive(Serialize)]
struct PortOutput<'a> {
    name: &'a str,
    kind: &'static str,
    description: String,
}

pub fn print_ports(ports: &[SerialPortInfo], format: OutputFormat) {
    let rows: Vec<PortOutput<'_>> = ports
        .iter()
        .map(|port| PortOutput {
            name: &port.port_name,
            kind: port_kind(&port.port_type),
            description: port_description(&port.port_type),
        })
        .collect();

    match format {
        OutputFormat::Json => {
            for row in &rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["PORT", "KIND", "DESCRIPTION"]);
            for row in &rows {
                table.add_row(vec![
                    row.name.to_string(),
                    row.kind.to_string(),
                    row.description.clone(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!("{} ({}) {}", row.name, row.kind, row.description);
            }
        }
    }
}

#[derive(Serialize)]
struct SettingsOutput {
    axis: &'static str,
    power: u8,
    reverse: bool,
    use_transfer_curve: bool,
    disabled: bool,
}

impl SettingsOutput {
    fn new(axis: Axis, settings: ChannelSettings) -> Self {
        Self {
            axis: axis.name(),
            power: settings.power,
            reverse: settings.flags.contains(OutputFlags::REVERSE),
            use_transfer_curve: settings.flags.contains(OutputFlags::USE_TRANSFER_CURVE),
            disabled: settings.flags.contains(OutputFlags::DISABLED),
        }
    }
}

pub fn print_settings(settings: &[(Axis, ChannelSettings)], format: OutputFormat) {
    let rows: Vec<SettingsOutput> = settings
        .iter()
        .map(|&(axis, settings)| SettingsOutput::new(axis, settings))
        .collect();

    match format {
        OutputFormat::Json => {
            for row in &rows {
                println!(
                    "{}",
                    serde_json::to_string(row).unwrap_or_else(|_| "{}".to_string())
                );
            }
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["AXIS", "POWER", "REVERSE", "CURVE", "DISABLED"]);
            for row in &rows {
                table.add_row(vec![
                    row.axis.to_string(),
                    row.power.to_string(),
                    row.reverse.to_string(),
                    row.use_transfer_curve.to_string(),
                    row.disabled.to_string(),
                ]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            for row in &rows {
                println!(
                    "{}: power={} reverse={} curve={} disabled={}",
                    row.axis, row.power, row.reverse, row.use_transfer_curve, row.disabled
                );
            }
        }
    }
}

#[derive(Serialize)]
struct EventOutput {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    axis: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    value: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    power: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    flags: Option<u8>,
}

pub fn print_event(event: &TelemetryEvent, format: OutputFormat) {
    let out = match *event {
        TelemetryEvent::Settings { axis, settings } => EventOutput {
            kind: "settings",
            axis: Some(axis.name()),
            value: None,
            power: Some(settings.power),
            flags: Some(settings.flags.bits()),
        },
        TelemetryEvent::Speed { axis, value } => EventOutput {
            kind: "speed",
            axis: Some(axis.name()),
            value: Some(value),
            power: None,
            flags: None,
        },
        TelemetryEvent::Diagnostic(value) => EventOutput {
            kind: "diagnostic",
            axis: None,
            value: Some(value),
            power: None,
            flags: None,
        },
    };

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table | OutputFormat::Pretty => match *event {
            TelemetryEvent::Settings { axis, settings } => {
                println!(
                    "settings {}: power={} flags={:#04x}",
                    axis.name(),
                    settings.power,
                    settings.flags.bits()
                );
            }
            TelemetryEvent::Speed { axis, value } => {
                println!("speed {}: {value}", axis.name());
            }
            TelemetryEvent::Diagnostic(value) => {
                println!("diagnostic: {value:#010x}");
            }
        },
    }
}

fn port_kind(port_type: &SerialPortType) -> &'static str {
    match port_type {
        SerialPortType::UsbPort(_) => "usb",
        SerialPortType::PciPort => "pci",
        SerialPortType::BluetoothPort => "bluetooth",
        SerialPortType::Unknown => "unknown",
    }
}

fn port_description(port_type: &SerialPortType) -> String {
    match port_type {
        SerialPortType::UsbPort(info) => {
            let product = info.product.as_deref().unwrap_or("USB serial device");
            format!("{product} ({:04x}:{:04x})", info.vid, info.pid)
        }
        _ => String::new(),
    }
}
