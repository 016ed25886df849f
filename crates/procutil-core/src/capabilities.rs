//! Runtime detection of kernel process-management features
//!
//! Probes the running kernel to determine whether pidfds and the
//! PR_SET_MM_MAP interface are usable, allowing callers to degrade
//! gracefully on older kernels.

use log::debug;

/// `PIDFD_THREAD` shares its value with `O_EXCL` (Linux 6.9+)
pub const PIDFD_THREAD: libc::c_uint = libc::O_EXCL as libc::c_uint;

/// Detected kernel capabilities for process primitives
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelCapabilities {
    /// pidfd_open(2) and pidfd_send_signal(2) are available (Linux 5.3+)
    pub has_pidfd: bool,
    /// pidfd_open(2) accepts PIDFD_THREAD
    pub has_pidfd_thread: bool,
    /// prctl(PR_SET_MM, PR_SET_MM_MAP) is compiled in (Linux 3.18+ with checkpoint/restore)
    pub has_mm_map: bool,
}

impl KernelCapabilities {
    /// Detect all capabilities on the running kernel
    pub fn detect() -> Self {
        let has_pidfd = detect_pidfd(0);
        let caps = Self {
            has_pidfd,
            has_pidfd_thread: has_pidfd && detect_pidfd(PIDFD_THREAD),
            has_mm_map: detect_mm_map(),
        };
        debug!("Detected kernel capabilities: {:?}", caps);
        caps
    }

    /// Get a human-readable summary of capabilities
    pub fn summary(&self) -> String {
        let check = |available: bool| if available { "[ok]" } else { "[--]" };

        [
            format!("{} pidfds", check(self.has_pidfd)),
            format!("{} pidfds for threads", check(self.has_pidfd_thread)),
            format!("{} PR_SET_MM_MAP", check(self.has_mm_map)),
        ]
        .join("\n")
    }
}

fn detect_pidfd(flags: libc::c_uint) -> bool {
    let pid = unsafe { libc::getpid() };
    // SAFETY: pidfd_open takes plain integers; a returned fd is closed right away
    let fd = unsafe { libc::syscall(libc::SYS_pidfd_open, pid, flags) };
    if fd < 0 {
        return false;
    }
    unsafe { libc::close(fd as libc::c_int) };
    true
}

fn detect_mm_map() -> bool {
    // PR_SET_MM_MAP_SIZE only reports the struct size the kernel expects,
    // it never modifies the memory map.
    let mut size: libc::c_uint = 0;
    let ret = unsafe {
        libc::prctl(
            libc::PR_SET_MM,
            libc::PR_SET_MM_MAP_SIZE as libc::c_ulong,
            &mut size as *mut libc::c_uint as libc::c_ulong,
            0 as libc::c_ulong,
            0 as libc::c_ulong,
        )
    };
    ret == 0 && size > 0
}
