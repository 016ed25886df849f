//! Kernel-encoded termination status

use nix::sys::signal::Signal;
use nix::sys::wait::WaitStatus;
use nix::unistd::Pid;
use procutil_core::Result;

/// Termination status exactly as reported by waitpid(2)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawWaitStatus(libc::c_int);

impl RawWaitStatus {
    pub fn from_raw(status: libc::c_int) -> Self {
        Self(status)
    }

    pub fn as_raw(&self) -> libc::c_int {
        self.0
    }

    /// Terminated through exit(2) or by returning from main
    pub fn exited(&self) -> bool {
        libc::WIFEXITED(self.0)
    }

    /// Exit code, if the process exited normally
    pub fn exit_code(&self) -> Option<i32> {
        self.exited().then(|| libc::WEXITSTATUS(self.0))
    }

    /// Terminated by a signal
    pub fn signaled(&self) -> bool {
        libc::WIFSIGNALED(self.0)
    }

    /// Terminating signal number, if killed by a signal
    pub fn term_signal(&self) -> Option<i32> {
        self.signaled().then(|| libc::WTERMSIG(self.0))
    }

    pub fn core_dumped(&self) -> bool {
        self.signaled() && libc::WCOREDUMP(self.0)
    }

    /// Normal exit with code 0
    pub fn is_success(&self) -> bool {
        self.exit_code() == Some(0)
    }

    /// Decode into nix's representation
    pub fn to_wait_status(&self, pid: Pid) -> Result<WaitStatus> {
        Ok(WaitStatus::from_raw(pid, self.0)?)
    }

    /// Shell-style exit code: the exit status, or 128 + signal
    pub fn shell_code(&self) -> i32 {
        match (self.exit_code(), self.term_signal()) {
            (Some(code), _) => code,
            (None, Some(sig)) => 128 + sig,
            _ => -1,
        }
    }

    /// Terminating signal as a typed value
    pub fn signal(&self) -> Option<Signal> {
        self.term_signal().and_then(|s| Signal::try_from(s).ok())
    }
}

impl From<RawWaitStatus> for libc::c_int {
    fn from(status: RawWaitStatus) -> Self {
        status.0
    }
}
