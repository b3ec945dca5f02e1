use std::sync::mpsc::{self, Receiver};
use std::time::Duration;

use gimbalctl_link::{LinkError, LinkEvent, LinkIo, Result, SerialLink};
use gimbalctl_wire::{Axis, ChannelSettings, Command, TelemetryEvent};
use tracing::debug;

/// Owner-visible connection state.
///
/// Transitions only on explicit connect/disconnect or when a link failure
/// event is consumed here. The worker thread exiting on its own does not
/// flip this — the owner reacts to the error event, not to the thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    Disconnected,
    Connected,
}

/// Owner-side view of one link: the event receiver plus the long-lived
/// per-axis settings mirror.
pub struct Session {
    link: SerialLink,
    events: Receiver<LinkEvent>,
    state: ConnectionState,
    mirror: [ChannelSettings; 2],
}

impl Session {
    /// Connect to a serial port and start the link worker.
    pub fn connect(port: &str) -> Self {
        let (tx, rx) = mpsc::channel();
        let link = SerialLink::connect(port, tx);
        Self::from_link(link, rx)
    }

    /// Build a session over an already-started link. Used with
    /// [`SerialLink::open_with`] in tests.
    pub fn from_link(link: SerialLink, events: Receiver<LinkEvent>) -> Self {
        Self {
            link,
            events,
            state: ConnectionState::Connected,
            mirror: [ChannelSettings::default(); 2],
        }
    }

    /// Connect over a custom [`LinkIo`] implementation.
    pub fn connect_with<T, F>(open: F) -> Self
    where
        T: LinkIo + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();
        let link = SerialLink::open_with(tx, open);
        Self::from_link(link, rx)
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// The mirrored settings for one axis, as of the last accepted report.
    pub fn settings(&self, axis: Axis) -> ChannelSettings {
        self.mirror[axis.index()]
    }

    /// Encode a command and queue it for transmission.
    pub fn send(&self, command: &Command) {
        self.link.submit(command);
    }

    /// Wait up to `timeout` for the next link event and fold it into the
    /// session state before returning it.
    pub fn poll_event(&mut self, timeout: Duration) -> Option<LinkEvent> {
        let event = self.events.recv_timeout(timeout).ok()?;
        self.apply(&event);
        Some(event)
    }

    fn apply(&mut self, event: &LinkEvent) {
        match event {
            LinkEvent::Telemetry(TelemetryEvent::Settings { axis, settings }) => {
                // Overwritten wholesale on each accepted report.
                self.mirror[axis.index()] = *settings;
            }
            LinkEvent::Telemetry(_) => {}
            LinkEvent::Error(err) => {
                debug!(%err, "link failed, marking session disconnected");
                self.state = ConnectionState::Disconnected;
            }
            LinkEvent::Closed => {
                self.state = ConnectionState::Disconnected;
            }
        }
    }

    /// Stop the link worker.
    pub fn disconnect(&mut self) -> std::result::Result<(), LinkError> {
        self.state = ConnectionState::Disconnected;
        self.link.disconnect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io::{ErrorKind, Read, Write};

    use gimbalctl_wire::OutputFlags;

    use super::*;

    struct ScriptedIo {
        reads: VecDeque<Vec<u8>>,
    }

    impl Read for ScriptedIo {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            match self.reads.pop_front() {
                Some(chunk) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    Ok(n)
                }
                None => {
                    std::thread::sleep(Duration::from_millis(1));
                    Err(std::io::Error::from(ErrorKind::TimedOut))
                }
            }
        }
    }

    impl Write for ScriptedIo {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl LinkIo for ScriptedIo {
        fn set_timeout(&mut self, _timeout: Duration) -> std::io::Result<()> {
            Ok(())
        }

        fn discard_input(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn scripted_session(reads: Vec<Vec<u8>>) -> Session {
        Session::connect_with(move || {
            Ok(ScriptedIo {
                reads: reads.into(),
            })
        })
    }

    #[test]
    fn settings_report_overwrites_mirror() {
        let mut session = scripted_session(vec![vec![b'c', 2, 0x80, 0x03]]);
        assert_eq!(session.state(), ConnectionState::Connected);

        let event = session
            .poll_event(Duration::from_secs(2))
            .expect("expected a telemetry event");
        assert!(matches!(event, LinkEvent::Telemetry(_)));

        let roll = session.settings(Axis::Roll);
        assert_eq!(roll.power, 0x80);
        assert!(roll.flags.contains(OutputFlags::REVERSE));
        assert!(roll.flags.contains(OutputFlags::USE_TRANSFER_CURVE));

        // The other axis keeps its defaults.
        assert_eq!(session.settings(Axis::Pitch), ChannelSettings::default());

        session.disconnect().unwrap();
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn open_failure_marks_session_disconnected() {
        let mut session = Session::connect_with(|| {
            Err::<ScriptedIo, _>(LinkError::Open {
                port: "/dev/ttyUSB9".into(),
                source: serialport::Error::new(serialport::ErrorKind::NoDevice, "no such device"),
            })
        });

        let event = session
            .poll_event(Duration::from_secs(2))
            .expect("expected an error event");
        assert!(matches!(event, LinkEvent::Error(LinkError::Open { .. })));
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn state_is_untouched_until_the_error_event_is_consumed() {
        let mut session = Session::connect_with(|| {
            Err::<ScriptedIo, _>(LinkError::Open {
                port: "none".into(),
                source: serialport::Error::new(serialport::ErrorKind::NoDevice, "gone"),
            })
        });

        // The worker has already failed, but the session still reads
        // Connected until the event is polled.
        assert_eq!(session.state(), ConnectionState::Connected);

        session.poll_event(Duration::from_secs(2));
        assert_eq!(session.state(), ConnectionState::Disconnected);
    }
}
