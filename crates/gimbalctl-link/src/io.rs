use std::io::{Read, Write};
use std::time::Duration;

use crate::error::{LinkError, Result};

/// Fixed link rate: 57600 baud, 8 data bits, no parity, 1 stop bit, no flow
/// control. Not negotiable per session.
pub const BAUD_RATE: u32 = 57_600;

/// Byte-level access to the physical link.
///
/// The worker loop is written against this trait so tests can run it over
/// in-memory fakes; [`SerialIo`] is the production implementation.
pub trait LinkIo: Read + Write + Send {
    /// Set the deadline applied to subsequent blocking reads and writes.
    fn set_timeout(&mut self, timeout: Duration) -> std::io::Result<()>;

    /// Discard any bytes already buffered on the receive side.
    fn discard_input(&mut self) -> std::io::Result<()>;
}

/// An open serial port at the fixed link parameters.
pub struct SerialIo {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialIo {
    /// Open `port_name` with the fixed link parameters.
    pub fn open(port_name: &str) -> Result<Self> {
        let port = serialport::new(port_name, BAUD_RATE)
            .data_bits(serialport::DataBits::Eight)
            .parity(serialport::Parity::None)
            .stop_bits(serialport::StopBits::One)
            .flow_control(serialport::FlowControl::None)
            .timeout(crate::worker::READ_TIMEOUT)
            .open()
            .map_err(|source| LinkError::Open {
                port: port_name.to_string(),
                source,
            })?;
        Ok(Self { port })
    }
}

impl Read for SerialIo {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.port.read(buf)
    }
}

impl Write for SerialIo {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.port.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.port.flush()
    }
}

impl LinkIo for SerialIo {
    fn set_timeout(&mut self, timeout: Duration) -> std::io::Result<()> {
        self.port.set_timeout(timeout).map_err(std::io::Error::other)
    }

    fn discard_input(&mut self) -> std::io::Result<()> {
        self.port
            .clear(serialport::ClearBuffer::Input)
            .map_err(std::io::Error::other)
    }
}

/// Enumerate the serial ports visible on this host.
pub fn available_ports() -> Result<Vec<serialport::SerialPortInfo>> {
    serialport::available_ports().map_err(LinkError::Enumerate)
}
