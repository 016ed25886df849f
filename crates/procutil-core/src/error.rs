//! Error types for process primitives

use nix::errno::Errno;
use thiserror::Error;

/// Result type for process primitives
pub type Result<T> = std::result::Result<T, ProcError>;

/// Errors that can occur in process primitives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProcError {
    #[error("OS error: {0}")]
    Os(#[from] Errno),

    #[error("Out of memory")]
    OutOfMemory,

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Process {pid} did not exit successfully")]
    WaitFailed { pid: i32 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl ProcError {
    /// Errno carried by an `Os` error
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            ProcError::Os(errno) => Some(*errno as i32),
            _ => None,
        }
    }

    /// Negative errno-style code for callers that speak the C convention
    pub fn to_neg_errno(&self) -> i32 {
        let errno = match self {
            ProcError::Os(errno) => *errno,
            ProcError::OutOfMemory => Errno::ENOMEM,
            ProcError::Parse(_) | ProcError::InvalidArgument(_) => Errno::EINVAL,
            ProcError::WaitFailed { .. } => Errno::ECHILD,
        };
        -(errno as i32)
    }

    /// Capture errno of the syscall that just failed
    pub fn last_os_error() -> Self {
        ProcError::Os(Errno::last())
    }

    /// True when the error means the target process no longer exists
    pub fn is_no_such_process(&self) -> bool {
        matches!(self, ProcError::Os(Errno::ESRCH))
    }
}

impl From<std::collections::TryReserveError> for ProcError {
    fn from(_: std::collections::TryReserveError) -> Self {
        ProcError::OutOfMemory
    }
}
