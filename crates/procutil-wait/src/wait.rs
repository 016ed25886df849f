//! waitpid(2) loops tolerant to EINTR and stray reaps

use log::debug;
use nix::errno::Errno;
use nix::unistd::Pid;
use procutil_core::{ProcError, Result};

use crate::status::RawWaitStatus;

/// One blocking call to the kernel wait primitive.
///
/// Returns the reaped pid and its raw status, or the errno of the failed call.
pub trait Waiter {
    fn wait(&mut self, pid: Pid) -> std::result::Result<(Pid, libc::c_int), Errno>;
}

/// Waiter backed by waitpid(2) with no options
#[derive(Debug, Clone, Copy, Default)]
pub struct SysWaiter;

impl Waiter for SysWaiter {
    fn wait(&mut self, pid: Pid) -> std::result::Result<(Pid, libc::c_int), Errno> {
        let mut status: libc::c_int = 0;
        // SAFETY: status is a valid out-pointer for the duration of the call
        let ret = unsafe { libc::waitpid(pid.as_raw(), &mut status, 0) };
        if ret == -1 {
            return Err(Errno::last());
        }
        Ok((Pid::from_raw(ret), status))
    }
}

impl<F> Waiter for F
where
    F: FnMut(Pid) -> std::result::Result<(Pid, libc::c_int), Errno>,
{
    fn wait(&mut self, pid: Pid) -> std::result::Result<(Pid, libc::c_int), Errno> {
        self(pid)
    }
}

/// Block until `pid` terminates; succeed only on a normal exit with code 0.
///
/// A nonzero exit, death by signal and a failed wait are all reported as
/// the same [`ProcError::WaitFailed`]. Use [`wait_for_exit_status`] to tell
/// them apart.
pub fn wait_for_exit(pid: Pid) -> Result<()> {
    wait_for_exit_with(&mut SysWaiter, pid)
}

/// Block until `pid` terminates and return its raw termination status
pub fn wait_for_exit_status(pid: Pid) -> Result<RawWaitStatus> {
    wait_for_exit_status_with(&mut SysWaiter, pid)
}

/// [`wait_for_exit`] over an arbitrary [`Waiter`]
pub fn wait_for_exit_with<W: Waiter + ?Sized>(waiter: &mut W, pid: Pid) -> Result<()> {
    match wait_for_exit_status_with(waiter, pid) {
        Ok(status) if status.is_success() => Ok(()),
        Ok(status) => {
            debug!("pid {} terminated with status {:#x}", pid, status.as_raw());
            Err(ProcError::WaitFailed { pid: pid.as_raw() })
        }
        Err(e) => {
            debug!("waiting for pid {} failed: {}", pid, e);
            Err(ProcError::WaitFailed { pid: pid.as_raw() })
        }
    }
}

/// [`wait_for_exit_status`] over an arbitrary [`Waiter`]
pub fn wait_for_exit_status_with<W: Waiter + ?Sized>(
    waiter: &mut W,
    pid: Pid,
) -> Result<RawWaitStatus> {
    loop {
        match waiter.wait(pid) {
            Err(Errno::EINTR) => {
                debug!("wait for pid {} interrupted, retrying", pid);
            }
            Err(errno) => return Err(ProcError::Os(errno)),
            Ok((reaped, _)) if reaped != pid => {
                debug!("reaped pid {} while waiting for {}, retrying", reaped, pid);
            }
            Ok((_, status)) => return Ok(RawWaitStatus::from_raw(status)),
        }
    }
}
