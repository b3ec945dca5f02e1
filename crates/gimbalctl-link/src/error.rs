use std::time::Duration;

/// Errors surfaced by the serial link.
///
/// Open, write-timeout, and I/O errors are fatal to the worker loop;
/// framing-level problems heal locally inside the parser and never appear
/// here.
#[derive(Debug, thiserror::Error)]
pub enum LinkError {
    /// The serial port could not be opened. The worker loop never starts.
    #[error("failed to open {port}: {source}")]
    Open {
        port: String,
        #[source]
        source: serialport::Error,
    },

    /// Port enumeration failed.
    #[error("port enumeration failed: {0}")]
    Enumerate(#[source] serialport::Error),

    /// A write did not complete within the write deadline. The worker loop
    /// terminates.
    #[error("write request timed out after {0:?}")]
    WriteTimeout(Duration),

    /// The worker thread did not exit within the disconnect timeout. The
    /// thread is leaked; this is a documented limitation, not corrected
    /// silently.
    #[error("worker thread still running after {0:?}")]
    ShutdownTimeout(Duration),

    /// I/O error on the open port. The worker loop terminates.
    #[error("link I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, LinkError>;
