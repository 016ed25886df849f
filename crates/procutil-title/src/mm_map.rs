//! prctl(PR_SET_MM, PR_SET_MM_MAP) descriptor and submission

use std::mem;
use std::ptr;

use log::{debug, warn};
use procutil_core::{ProcError, Result};

use crate::stat::StatLayout;

/// `struct prctl_mm_map` from <linux/prctl.h>
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MmMap {
    pub start_code: u64,
    pub end_code: u64,
    pub start_data: u64,
    pub end_data: u64,
    pub start_brk: u64,
    pub brk: u64,
    pub start_stack: u64,
    pub arg_start: u64,
    pub arg_end: u64,
    pub env_start: u64,
    pub env_end: u64,
    pub auxv: *mut u64,
    pub auxv_size: u32,
    pub exe_fd: u32,
}

impl MmMap {
    /// Descriptor keeping every boundary of `layout` except the argument
    /// region, which is redirected to `[arg_start, arg_end)`.
    ///
    /// The auxiliary vector and executable are left untouched.
    pub fn with_args(layout: &StatLayout, brk: u64, arg_start: u64, arg_end: u64) -> Self {
        Self {
            start_code: layout.start_code,
            end_code: layout.end_code,
            start_data: layout.start_data,
            end_data: layout.end_data,
            start_brk: layout.start_brk,
            brk,
            start_stack: layout.start_stack,
            arg_start,
            arg_end,
            env_start: layout.env_start,
            env_end: layout.env_end,
            auxv: ptr::null_mut(),
            auxv_size: 0,
            exe_fd: u32::MAX,
        }
    }

    /// Install the descriptor for the calling process
    pub fn publish(&self) -> Result<()> {
        // SAFETY: self is a fully initialised prctl_mm_map that outlives the
        // call; the kernel only reads it
        let ret = unsafe {
            libc::prctl(
                libc::PR_SET_MM,
                libc::PR_SET_MM_MAP as libc::c_ulong,
                self as *const Self as libc::c_ulong,
                mem::size_of::<Self>() as libc::c_ulong,
                0 as libc::c_ulong,
            )
        };
        if ret != 0 {
            let err = ProcError::last_os_error();
            warn!("PR_SET_MM_MAP rejected: {}", err);
            return Err(err);
        }

        debug!(
            "Published memory map, args at {:#x}..{:#x}",
            self.arg_start, self.arg_end
        );
        Ok(())
    }
}

/// Current program break, queried directly from the kernel
pub fn current_brk() -> u64 {
    // SAFETY: brk(0) never moves the break, it only reports it
    unsafe { libc::syscall(libc::SYS_brk, 0) as u64 }
}
