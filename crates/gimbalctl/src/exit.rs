use std::fmt;
use std::io;

use gimbalctl_link::LinkError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const LINK_ERROR: i32 = 3;
#[allow(dead_code)]
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => FAILURE,
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => TIMEOUT,
        io::ErrorKind::NotFound => LINK_ERROR,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn link_error(context: &str, err: LinkError) -> CliError {
    match err {
        LinkError::Io(source) => io_error(context, source),
        LinkError::Open { .. } | LinkError::Enumerate(_) => {
            CliError::new(LINK_ERROR, format!("{context}: {err}"))
        }
        LinkError::WriteTimeout(_) | LinkError::ShutdownTimeout(_) => {
            CliError::new(TIMEOUT, format!("{context}: {err}"))
        }
    }
}
