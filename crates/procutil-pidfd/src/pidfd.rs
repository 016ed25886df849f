//! pidfd_open(2) / pidfd_send_signal(2) wrappers

use std::os::fd::{AsFd, AsRawFd, BorrowedFd, FromRawFd, IntoRawFd, OwnedFd, RawFd};
use std::ptr;

use bitflags::bitflags;
use log::debug;
use nix::sys::signal::Signal;
use nix::unistd::Pid;
use procutil_core::capabilities::PIDFD_THREAD;
use procutil_core::{ProcError, Result};

bitflags! {
    /// Flags accepted by pidfd_open(2)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct PidFdFlags: libc::c_uint {
        /// Return a non-blocking pidfd (PIDFD_NONBLOCK)
        const NONBLOCK = libc::O_NONBLOCK as libc::c_uint;
        /// Refer to a thread instead of a thread-group leader (PIDFD_THREAD)
        const THREAD = PIDFD_THREAD;
    }
}

/// Handle to a single process instance.
///
/// The handle is owned by the caller; the underlying descriptor is closed
/// when the `PidFd` is dropped. Use [`IntoRawFd`] to hand it off instead.
#[derive(Debug)]
pub struct PidFd {
    fd: OwnedFd,
}

impl PidFd {
    /// Open a handle for `pid`
    pub fn open(pid: Pid) -> Result<Self> {
        Self::open_with_flags(pid, PidFdFlags::empty())
    }

    /// Open a handle for `pid` with explicit pidfd_open(2) flags
    pub fn open_with_flags(pid: Pid, flags: PidFdFlags) -> Result<Self> {
        // SAFETY: pidfd_open takes plain integers and returns a new fd or -1
        let ret = unsafe { libc::syscall(libc::SYS_pidfd_open, pid.as_raw(), flags.bits()) };
        if ret < 0 {
            let err = ProcError::last_os_error();
            debug!("pidfd_open({}) failed: {}", pid, err);
            return Err(err);
        }

        debug!("Opened pidfd {} for pid {}", ret, pid);
        // SAFETY: the kernel just handed us ownership of this descriptor
        let fd = unsafe { OwnedFd::from_raw_fd(ret as RawFd) };
        Ok(Self { fd })
    }

    /// Send `signal` to the referenced process.
    ///
    /// `None` performs the permission/existence probe of signal 0 without
    /// delivering anything. `info` is forwarded as the siginfo payload and
    /// `flags` as the pidfd_send_signal(2) flags argument.
    pub fn send_signal(
        &self,
        signal: Option<Signal>,
        info: Option<&libc::siginfo_t>,
        flags: libc::c_uint,
    ) -> Result<()> {
        let signo = signal.map_or(0, |s| s as libc::c_int);
        let info_ptr = info.map_or(ptr::null(), |i| i as *const libc::siginfo_t);

        // SAFETY: the fd is valid for the lifetime of self and info_ptr is
        // either null or points at a live siginfo_t
        let ret = unsafe {
            libc::syscall(
                libc::SYS_pidfd_send_signal,
                self.fd.as_raw_fd(),
                signo,
                info_ptr,
                flags,
            )
        };
        if ret < 0 {
            return Err(ProcError::last_os_error());
        }

        if signal.is_some() {
            debug!("Sent signal {} via pidfd {}", signo, self.fd.as_raw_fd());
        }
        Ok(())
    }

    /// Deliver `signal` with no siginfo and no flags
    pub fn kill(&self, signal: Signal) -> Result<()> {
        self.send_signal(Some(signal), None, 0)
    }

    /// True while the referenced process instance exists.
    ///
    /// An exited but not yet reaped child (zombie) still counts as alive.
    pub fn is_alive(&self) -> bool {
        self.send_signal(None, None, 0).is_ok()
    }
}

impl AsFd for PidFd {
    fn as_fd(&self) -> BorrowedFd<'_> {
        self.fd.as_fd()
    }
}

impl AsRawFd for PidFd {
    fn as_raw_fd(&self) -> RawFd {
        self.fd.as_raw_fd()
    }
}

impl IntoRawFd for PidFd {
    fn into_raw_fd(self) -> RawFd {
        self.fd.into_raw_fd()
    }
}

impl FromRawFd for PidFd {
    /// # Safety
    ///
    /// `fd` must be an open pidfd not owned by anything else.
    unsafe fn from_raw_fd(fd: RawFd) -> Self {
        Self {
            fd: unsafe { OwnedFd::from_raw_fd(fd) },
        }
    }
}

impl From<OwnedFd> for PidFd {
    fn from(fd: OwnedFd) -> Self {
        Self { fd }
    }
}

impl From<PidFd> for OwnedFd {
    fn from(pidfd: PidFd) -> Self {
        pidfd.fd
    }
}
