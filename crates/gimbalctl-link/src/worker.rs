use std::io::ErrorKind;
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use bytes::{Buf, BytesMut};
use gimbalctl_wire::{decode, Command, FrameParser, TelemetryEvent};
use tracing::{debug, info, warn};

use crate::error::{LinkError, Result};
use crate::io::{LinkIo, SerialIo};

/// Deadline for one transmit attempt per loop iteration.
pub const WRITE_TIMEOUT: Duration = Duration::from_millis(20);
/// How long one iteration waits for the first incoming byte.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);
/// Extra-drain window once bytes have started arriving.
pub const READ_TIMEOUT_EXTRA: Duration = Duration::from_millis(10);
/// Upper bound on waiting for the worker thread during disconnect.
pub const DISCONNECT_TIMEOUT: Duration = Duration::from_millis(5000);

const READ_CHUNK_SIZE: usize = 256;

/// Messages delivered from the worker context to the owner context, in the
/// exact order their bytes arrived.
#[derive(Debug)]
pub enum LinkEvent {
    /// One decoded frame.
    Telemetry(TelemetryEvent),
    /// A fatal link error. The worker loop has terminated (or, for an open
    /// failure, never started).
    Error(LinkError),
    /// The worker loop exited after a stop request.
    Closed,
}

/// Transmit/receive queues plus the stop flag — the only state shared
/// between the owner and worker contexts.
#[derive(Debug, Default)]
struct Shared {
    tx: BytesMut,
    rx: BytesMut,
    stop: bool,
}

/// Handle to the worker that owns the physical link.
///
/// Commands are appended to the transmit queue from the owner context with no
/// backpressure; decoded telemetry and fatal errors come back over the event
/// channel. Dropping the handle requests a stop and waits out the disconnect
/// timeout.
pub struct SerialLink {
    shared: Arc<Mutex<Shared>>,
    worker: Option<JoinHandle<()>>,
}

impl SerialLink {
    /// Open `port_name` on a dedicated worker thread and start the loop.
    ///
    /// An open failure is delivered as [`LinkEvent::Error`] on `events`; the
    /// loop never starts in that case.
    pub fn connect(port_name: &str, events: Sender<LinkEvent>) -> Self {
        let port_name = port_name.to_string();
        Self::open_with(events, move || SerialIo::open(&port_name))
    }

    /// Start the worker over a custom [`LinkIo`] implementation.
    ///
    /// `open` runs on the worker thread; an error from it is delivered as
    /// [`LinkEvent::Error`] exactly like a serial open failure. Intended for
    /// tests and link simulators.
    pub fn open_with<T, F>(events: Sender<LinkEvent>, open: F) -> Self
    where
        T: LinkIo + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        let shared = Arc::new(Mutex::new(Shared::default()));
        let worker_shared = Arc::clone(&shared);

        let handle = std::thread::spawn(move || {
            let io = match open() {
                Ok(io) => io,
                Err(err) => {
                    warn!(%err, "link open failed");
                    let _ = events.send(LinkEvent::Error(err));
                    return;
                }
            };
            run_loop(io, &worker_shared, &events);
        });

        Self {
            shared,
            worker: Some(handle),
        }
    }

    /// Encode a command and queue it for transmission.
    pub fn submit(&self, command: &Command) {
        let mut shared = lock(&self.shared);
        command.encode(&mut shared.tx);
    }

    /// Queue raw wire bytes for transmission.
    pub fn submit_raw(&self, bytes: &[u8]) {
        lock(&self.shared).tx.extend_from_slice(bytes);
    }

    /// Request a graceful stop and wait up to [`DISCONNECT_TIMEOUT`] for the
    /// worker to exit.
    ///
    /// On timeout the thread is leaked and [`LinkError::ShutdownTimeout`] is
    /// returned; the link handle is spent either way.
    pub fn disconnect(&mut self) -> Result<()> {
        lock(&self.shared).stop = true;

        let Some(handle) = self.worker.take() else {
            return Ok(());
        };

        let deadline = Instant::now() + DISCONNECT_TIMEOUT;
        while !handle.is_finished() {
            if Instant::now() >= deadline {
                warn!("failed to stop worker thread, leaking it");
                return Err(LinkError::ShutdownTimeout(DISCONNECT_TIMEOUT));
            }
            std::thread::sleep(Duration::from_millis(10));
        }
        let _ = handle.join();
        Ok(())
    }
}

impl Drop for SerialLink {
    fn drop(&mut self) {
        if self.worker.is_some() {
            let _ = self.disconnect();
        }
    }
}

fn lock(shared: &Arc<Mutex<Shared>>) -> MutexGuard<'_, Shared> {
    shared.lock().unwrap_or_else(PoisonError::into_inner)
}

fn run_loop<T: LinkIo>(mut io: T, shared: &Arc<Mutex<Shared>>, events: &Sender<LinkEvent>) {
    info!("serial worker ready");

    if let Err(err) = io.discard_input() {
        debug!(%err, "could not discard stale input");
    }

    let mut parser = FrameParser::new();

    loop {
        if lock(shared).stop {
            break;
        }

        // Write path: snapshot the pending bytes, write outside the lock,
        // then drop exactly the bytes the port confirmed.
        let pending = {
            let shared = lock(shared);
            if shared.tx.is_empty() {
                None
            } else {
                Some(shared.tx.clone())
            }
        };
        if let Some(pending) = pending {
            match write_pending(&mut io, &pending) {
                Ok(written) => {
                    lock(shared).tx.advance(written);
                }
                Err(err) => {
                    warn!(%err, "write failed, stopping worker");
                    let _ = events.send(LinkEvent::Error(err));
                    return;
                }
            }
        }

        // Read path: wait for the first byte, then keep draining on the
        // shorter deadline until the line goes quiet.
        let received = match poll_incoming(&mut io, shared) {
            Ok(n) => n,
            Err(err) => {
                warn!(%err, "read failed, stopping worker");
                let _ = events.send(LinkEvent::Error(err));
                return;
            }
        };

        if received > 0 && !dispatch_frames(&mut parser, shared, events) {
            // Event receiver is gone; nobody is listening.
            debug!("event channel closed, stopping worker");
            return;
        }
    }

    info!("serial worker stopping");
    let _ = events.send(LinkEvent::Closed);
}

/// One transmit attempt under the write deadline. Returns the number of
/// bytes the port accepted; a deadline miss is fatal.
fn write_pending<T: LinkIo>(io: &mut T, pending: &[u8]) -> Result<usize> {
    io.set_timeout(WRITE_TIMEOUT)?;
    loop {
        match io.write(pending) {
            Ok(n) => return Ok(n),
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::TimedOut || err.kind() == ErrorKind::WouldBlock => {
                return Err(LinkError::WriteTimeout(WRITE_TIMEOUT));
            }
            Err(err) => return Err(LinkError::Io(err)),
        }
    }
}

/// Wait up to [`READ_TIMEOUT`] for incoming bytes, then extra-drain with
/// [`READ_TIMEOUT_EXTRA`] until nothing more arrives within that window.
/// Appends everything to the receive queue and returns the byte count.
fn poll_incoming<T: LinkIo>(io: &mut T, shared: &Arc<Mutex<Shared>>) -> Result<usize> {
    let mut chunk = [0u8; READ_CHUNK_SIZE];
    let mut received = 0usize;

    io.set_timeout(READ_TIMEOUT)?;
    loop {
        match io.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                lock(shared).rx.extend_from_slice(&chunk[..n]);
                received += n;
                io.set_timeout(READ_TIMEOUT_EXTRA)?;
            }
            Err(err) if err.kind() == ErrorKind::Interrupted => continue,
            Err(err) if err.kind() == ErrorKind::TimedOut || err.kind() == ErrorKind::WouldBlock => {
                break;
            }
            Err(err) => return Err(LinkError::Io(err)),
        }
    }

    Ok(received)
}

/// Pull complete frames until the parser reports none, decoding and
/// dispatching each in arrival order. Rejected frames are logged and
/// dropped. Returns false once the event receiver has hung up.
fn dispatch_frames(
    parser: &mut FrameParser,
    shared: &Arc<Mutex<Shared>>,
    events: &Sender<LinkEvent>,
) -> bool {
    loop {
        let frame = {
            let mut shared = lock(shared);
            parser.try_extract(&mut shared.rx)
        };
        let Some(frame) = frame else {
            return true;
        };

        match decode(&frame) {
            Ok(event) => {
                if events.send(LinkEvent::Telemetry(event)).is_err() {
                    return false;
                }
            }
            Err(err) => warn!(%err, "dropping frame"),
        }
    }
}
